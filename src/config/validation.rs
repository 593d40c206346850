//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of every entry (serde handles syntactic)
//! - Reduce document validity to the conjunction of all entry checks
//!
//! # Design Decisions
//! - Returns all validation problems, not just the first
//! - Every entry kind is one variant of [`ConfigEntry`] with a single `validate`
//! - Runs before a document is accepted into the store

use std::fmt;

use crate::config::schema::{
    split_list, CaConf, CertVerifConf, ConfigDocument, ProofConf, SignVerifConf, SignatureConf,
    SignatureParameters,
};
use crate::security::secrets;

/// Which collection an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Signature,
    Proof,
    SignatureVerification,
    CertificateVerification,
    Ca,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryKind::Signature => "signature",
            EntryKind::Proof => "proof",
            EntryKind::SignatureVerification => "signatureVerification",
            EntryKind::CertificateVerification => "certificateVerification",
            EntryKind::Ca => "ca",
        };
        f.write_str(name)
    }
}

/// A single validation failure, located by collection, position and field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryProblem {
    pub kind: EntryKind,
    pub index: usize,
    pub id: String,
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for EntryProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] (id '{}'): {} {}",
            self.kind, self.index, self.id, self.field, self.reason
        )
    }
}

/// One entry of any of the five collections.
#[derive(Debug, Clone, Copy)]
pub enum ConfigEntry<'a> {
    Signature(&'a SignatureConf),
    Proof(&'a ProofConf),
    SignatureVerification(&'a SignVerifConf),
    CertificateVerification(&'a CertVerifConf),
    Ca(&'a CaConf),
}

impl<'a> ConfigEntry<'a> {
    pub fn kind(&self) -> EntryKind {
        match self {
            ConfigEntry::Signature(_) => EntryKind::Signature,
            ConfigEntry::Proof(_) => EntryKind::Proof,
            ConfigEntry::SignatureVerification(_) => EntryKind::SignatureVerification,
            ConfigEntry::CertificateVerification(_) => EntryKind::CertificateVerification,
            ConfigEntry::Ca(_) => EntryKind::Ca,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            ConfigEntry::Signature(c) => &c.id,
            ConfigEntry::Proof(c) => &c.id,
            ConfigEntry::SignatureVerification(c) => &c.id,
            ConfigEntry::CertificateVerification(c) => &c.id,
            ConfigEntry::Ca(c) => &c.id,
        }
    }

    /// Self-check of this entry. An empty result means the entry is valid.
    pub fn validate(&self) -> Vec<(&'static str, String)> {
        let mut problems = Vec::new();
        require(&mut problems, "id", self.id());

        match self {
            ConfigEntry::Signature(c) => {
                require(&mut problems, "proofConfId", &c.proof_conf_id);
                check_sign_params(&mut problems, &c.sign_params);
                if let Some(secret) = &c.secret {
                    for token in secret.split_whitespace() {
                        if let Err(e) = secrets::parse_hash(token) {
                            problems.push(("secret", format!("holds an unusable hash: {}", e)));
                        }
                    }
                }
            }
            ConfigEntry::Proof(c) => check_sign_params(&mut problems, &c.sign_proof_params),
            ConfigEntry::SignatureVerification(c) => {
                check_list(&mut problems, "rules", &c.sign_verif_params.rules, true);
                check_list(&mut problems, "metadata", &c.sign_verif_params.metadata, false);
            }
            ConfigEntry::CertificateVerification(c) => {
                check_list(&mut problems, "rules", &c.cert_verif_params.rules, true);
                check_list(&mut problems, "metadata", &c.cert_verif_params.metadata, false);
            }
            ConfigEntry::Ca(c) => {
                require(&mut problems, "certificate", &c.certificate);
                require(&mut problems, "crl", &c.crl);
            }
        }
        problems
    }
}

fn require(problems: &mut Vec<(&'static str, String)>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        problems.push((field, "must not be blank".to_string()));
    }
}

fn check_sign_params(problems: &mut Vec<(&'static str, String)>, params: &SignatureParameters) {
    require(problems, "certificate", &params.certificate);
    require(problems, "password", &params.password);
    require(problems, "digestAlgorithm", &params.digest_algorithm);
    require(problems, "canonicalisationAlgorithm", &params.canonicalisation_algorithm);
}

fn check_list(
    problems: &mut Vec<(&'static str, String)>,
    field: &'static str,
    raw: &str,
    required: bool,
) {
    let items = split_list(raw);
    if required && items.is_empty() {
        problems.push((field, "must list at least one item".to_string()));
    }
    if items.iter().any(|item| item.is_empty()) {
        problems.push((field, "contains a blank item".to_string()));
    }
}

impl ConfigDocument {
    /// All entries in document order, collection by collection.
    pub fn entries(&self) -> impl Iterator<Item = ConfigEntry<'_>> {
        self.signature
            .iter()
            .map(ConfigEntry::Signature)
            .chain(self.proof.iter().map(ConfigEntry::Proof))
            .chain(self.signature_verification.iter().map(ConfigEntry::SignatureVerification))
            .chain(self.certificate_verification.iter().map(ConfigEntry::CertificateVerification))
            .chain(self.ca.iter().map(ConfigEntry::Ca))
    }
}

/// Validates every entry of every collection.
///
/// The document is valid only if all entries are; every entry is checked so
/// the returned list is complete.
pub fn validate_document(doc: &ConfigDocument) -> Result<(), Vec<EntryProblem>> {
    let mut problems = Vec::new();
    let mut last_kind = None;
    let mut index = 0;

    for entry in doc.entries() {
        if last_kind != Some(entry.kind()) {
            last_kind = Some(entry.kind());
            index = 0;
        }
        for (field, reason) in entry.validate() {
            problems.push(EntryProblem {
                kind: entry.kind(),
                index,
                id: entry.id().to_string(),
                field,
                reason,
            });
        }
        index += 1;
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
