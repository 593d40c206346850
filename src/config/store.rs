//! Live configuration store.
//!
//! # Responsibilities
//! - Hold the current validated snapshot
//! - Serve id lookups to request handlers without locking
//! - Replace the snapshot atomically on a successful reload
//!
//! # Design Decisions
//! - A snapshot is immutable once built; reload publishes a new `Arc`
//! - Readers take one snapshot per request, so all lookups of a request see
//!   the same configuration generation
//! - A failed reload leaves the published snapshot untouched

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{CertVerifConf, ConfigDocument, ProofConf, SignVerifConf, SignatureConf};
use crate::observability::metrics;

/// Index from id to position, keeping the first occurrence of each id.
fn index_by_id<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        index.entry(id.to_string()).or_insert(position);
    }
    index
}

/// An immutable, fully validated configuration document.
#[derive(Debug)]
pub struct ConfigSnapshot {
    document: ConfigDocument,
    signature_index: HashMap<String, usize>,
    proof_index: HashMap<String, usize>,
    signature_verification_index: HashMap<String, usize>,
    certificate_verification_index: HashMap<String, usize>,
}

impl ConfigSnapshot {
    /// Build a snapshot from an already validated document.
    pub(crate) fn new(document: ConfigDocument) -> Self {
        Self {
            signature_index: index_by_id(document.signature.iter().map(|c| c.id.as_str())),
            proof_index: index_by_id(document.proof.iter().map(|c| c.id.as_str())),
            signature_verification_index: index_by_id(
                document.signature_verification.iter().map(|c| c.id.as_str()),
            ),
            certificate_verification_index: index_by_id(
                document.certificate_verification.iter().map(|c| c.id.as_str()),
            ),
            document,
        }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn signature_by_id(&self, id: &str) -> Option<&SignatureConf> {
        self.signature_index.get(id).map(|&i| &self.document.signature[i])
    }

    pub fn proof_by_id(&self, id: &str) -> Option<&ProofConf> {
        self.proof_index.get(id).map(|&i| &self.document.proof[i])
    }

    pub fn signature_verification_by_id(&self, id: &str) -> Option<&SignVerifConf> {
        self.signature_verification_index
            .get(id)
            .map(|&i| &self.document.signature_verification[i])
    }

    pub fn certificate_verification_by_id(&self, id: &str) -> Option<&CertVerifConf> {
        self.certificate_verification_index
            .get(id)
            .map(|&i| &self.document.certificate_verification[i])
    }
}

/// Holder of the current configuration snapshot.
pub struct ConfigStore {
    path: PathBuf,
    current: ArcSwap<ConfigSnapshot>,
}

impl ConfigStore {
    /// Load the configuration at `path`.
    ///
    /// Fails when the document is unreadable or invalid; the service must not
    /// start without a valid configuration.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let snapshot = load_config(&path)?;
        tracing::info!(path = %path.display(), "Configurations loaded");
        Ok(Self::with_snapshot(path, snapshot))
    }

    /// Build a store around an existing snapshot.
    pub fn with_snapshot(path: impl Into<PathBuf>, snapshot: ConfigSnapshot) -> Self {
        Self {
            path: path.into(),
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// Path of the backing configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The snapshot currently published.
    pub fn current(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    /// Reload from disk, publishing the new snapshot only if it is valid.
    ///
    /// Returns whether a swap happened.
    pub fn reload(&self) -> bool {
        match load_config(&self.path) {
            Ok(snapshot) => {
                self.try_swap(snapshot);
                tracing::info!(path = %self.path.display(), "New configurations loaded");
                metrics::record_config_reload(true);
                true
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not load new configurations, will continue using current valid configurations"
                );
                metrics::record_config_reload(false);
                false
            }
        }
    }

    /// Publish `snapshot` as the current configuration.
    pub(crate) fn try_swap(&self, snapshot: ConfigSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    pub fn signature_by_id(&self, id: &str) -> Option<SignatureConf> {
        self.current.load().signature_by_id(id).cloned()
    }

    pub fn proof_by_id(&self, id: &str) -> Option<ProofConf> {
        self.current.load().proof_by_id(id).cloned()
    }

    pub fn signature_verification_by_id(&self, id: &str) -> Option<SignVerifConf> {
        self.current.load().signature_verification_by_id(id).cloned()
    }

    pub fn certificate_verification_by_id(&self, id: &str) -> Option<CertVerifConf> {
        self.current.load().certificate_verification_by_id(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// A document where every entry's description carries `generation`.
    fn generation_document(generation: u32) -> String {
        format!(
            r#"{{
                "signature": [{{
                    "id": "1", "proofConfId": "1", "description": "g{g}",
                    "certificate": "sign.p12", "password": "pwd", "digestAlgorithm": "SHA512",
                    "canonicalisationAlgorithm": "c14n", "signaturePackaging": "ENVELOPED"
                }}],
                "proof": [{{
                    "id": "1", "description": "g{g}",
                    "certificate": "proof.p12", "password": "pwd", "digestAlgorithm": "SHA512",
                    "canonicalisationAlgorithm": "c14n", "signaturePackaging": "ENVELOPED"
                }}],
                "signatureVerification": [{{ "id": "1", "description": "g{g}", "rules": "r" }}],
                "certificateVerification": [{{ "id": "1", "description": "g{g}", "rules": "r" }}],
                "ca": []
            }}"#,
            g = generation
        )
    }

    fn snapshot(generation: u32) -> ConfigSnapshot {
        parse_config(&generation_document(generation)).unwrap()
    }

    #[test]
    fn test_lookups_absent_is_none() {
        let store = ConfigStore::with_snapshot("unused.json", snapshot(0));
        assert!(store.signature_by_id("1").is_some());
        assert!(store.signature_by_id("42").is_none());
        assert!(store.proof_by_id("42").is_none());
        assert!(store.signature_verification_by_id("42").is_none());
        assert!(store.certificate_verification_by_id("42").is_none());
    }

    #[test]
    fn test_duplicate_ids_return_first_match() {
        let doc = generation_document(0).replace(
            r#""signatureVerification": [{ "id": "1", "description": "g0", "rules": "r" }]"#,
            r#""signatureVerification": [
                { "id": "1", "description": "first", "rules": "r" },
                { "id": "1", "description": "second", "rules": "r" }
            ]"#,
        );
        let snapshot = parse_config(&doc).unwrap();
        let conf = snapshot.signature_verification_by_id("1").unwrap();
        assert_eq!(conf.description.as_deref(), Some("first"));
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.json");
        std::fs::write(&path, generation_document(1)).unwrap();

        let store = ConfigStore::open(&path).unwrap();
        let before = store.current();

        std::fs::write(&path, "{ not json").unwrap();
        assert!(!store.reload());

        let after = store.current();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(
            after.signature_by_id("1").unwrap().description.as_deref(),
            Some("g1")
        );

        std::fs::write(&path, generation_document(2)).unwrap();
        assert!(store.reload());
        assert_eq!(
            store.current().proof_by_id("1").unwrap().description.as_deref(),
            Some("g2")
        );
    }

    #[test]
    fn test_open_fails_on_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.json");
        std::fs::write(&path, generation_document(1).replace("sign.p12", "")).unwrap();

        assert!(matches!(ConfigStore::open(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_readers_never_see_mixed_generations() {
        let store = Arc::new(ConfigStore::with_snapshot("unused.json", snapshot(0)));
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                let done = done.clone();
                std::thread::spawn(move || {
                    let mut reads = 0u32;
                    while !done.load(Ordering::Relaxed) || reads < 100 {
                        let snap = store.current();
                        let expected = snap.signature_by_id("1").unwrap().description.clone();
                        assert_eq!(snap.proof_by_id("1").unwrap().description, expected);
                        assert_eq!(snap.signature_verification_by_id("1").unwrap().description, expected);
                        assert_eq!(snap.certificate_verification_by_id("1").unwrap().description, expected);
                        reads += 1;
                    }
                })
            })
            .collect();

        for generation in 1..200 {
            store.try_swap(snapshot(generation));
        }
        done.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(
            store.current().signature_by_id("1").unwrap().description.as_deref(),
            Some("g199")
        );
    }
}
