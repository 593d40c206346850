//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

use sign_gateway::capabilities::{
    CaCrlService, Capabilities, CapabilityError, CertificateDocument, CertificateStatus,
    CertificateValidationReport, CertificateValidationService, MetaDatum, MetadataKind,
    ProofGenerationService, ProofParameters, ReportError, SignatureReport, SignatureService,
    SignatureValidationService, ValidationReport,
};
use sign_gateway::config::schema::{
    CertificateValidationParameters, SignatureParameters, SignatureValidationParameters,
};
use sign_gateway::config::settings::ListenerConfig;
use sign_gateway::config::ConfigStore;
use sign_gateway::orchestrator::{Orchestrator, Rejection};
use sign_gateway::{HttpServer, Shutdown};

pub const SIGN_CERT: &str = "sign.p12";
pub const PROOF_CERT: &str = "proof.p12";
pub const SECRET: &str = "open-sesame";

/// Kind of failure a fake call should end with.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Client,
    Server,
    Processing,
}

impl Failure {
    fn error(self) -> CapabilityError {
        match self {
            Failure::Client => CapabilityError::client("fake client failure"),
            Failure::Server => CapabilityError::server("fake server failure"),
            Failure::Processing => CapabilityError::processing("fake processing failure"),
        }
    }
}

/// Signing engine double recording every call in order.
#[derive(Default)]
pub struct FakeEngine {
    calls: Mutex<Vec<String>>,
    proof_params: Mutex<Option<ProofParameters>>,
    validation_errors: Mutex<Vec<ReportError>>,
    rejected_certificate: Mutex<Option<(String, Rejection)>>,
    failing_call: Mutex<Option<(String, Failure)>>,
}

impl FakeEngine {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn proof_params(&self) -> Option<ProofParameters> {
        self.proof_params.lock().unwrap().clone()
    }

    /// Validations report these errors (and are invalid) from now on.
    pub fn set_validation_errors(&self, errors: Vec<ReportError>) {
        *self.validation_errors.lock().unwrap() = errors;
    }

    /// The pre-flight check of `certificate` answers `rejection`.
    pub fn reject_certificate(&self, certificate: &str, rejection: Rejection) {
        *self.rejected_certificate.lock().unwrap() = Some((certificate.to_string(), rejection));
    }

    /// The call named `call` fails with `failure`.
    pub fn fail(&self, call: &str, failure: Failure) {
        *self.failing_call.lock().unwrap() = Some((call.to_string(), failure));
    }

    fn record(&self, call: impl Into<String>) -> Result<(), CapabilityError> {
        let call = call.into();
        let failure = self
            .failing_call
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(name, _)| call.starts_with(name.as_str()))
            .map(|(_, failure)| *failure);
        self.calls.lock().unwrap().push(call);
        match failure {
            Some(failure) => Err(failure.error()),
            None => Ok(()),
        }
    }

    fn validation(&self) -> ValidationReport {
        let errors = self.validation_errors.lock().unwrap().clone();
        ValidationReport {
            valid: errors.is_empty(),
            errors,
            metadata: vec![
                MetaDatum::new(MetadataKind::DateSignature, "2024-05-02T10:00:00Z"),
                MetaDatum::new(MetadataKind::RapportDss, "<dss/>"),
            ],
        }
    }
}

impl CaCrlService for FakeEngine {
    fn check_certificate(
        &self,
        params: &SignatureParameters,
    ) -> Result<CertificateStatus, CapabilityError> {
        self.record(format!("check_certificate:{}", params.certificate))?;
        let rejected = self.rejected_certificate.lock().unwrap().clone();
        Ok(match rejected {
            Some((certificate, rejection)) if certificate == params.certificate => {
                CertificateStatus::Reject(rejection)
            }
            _ => CertificateStatus::Continue,
        })
    }

    fn ca_list(&self) -> Result<Vec<String>, CapabilityError> {
        self.record("ca_list")?;
        Ok(vec!["CN=TEST AC RACINE".to_string()])
    }
}

impl SignatureService for FakeEngine {
    fn sign_xades_baseline_b(
        &self,
        document: &str,
        params: &SignatureParameters,
    ) -> Result<SignatureReport, CapabilityError> {
        self.record(format!("sign_xades:{}", params.certificate))?;
        Ok(SignatureReport {
            signed_document: format!("<signed>{document}</signed>"),
            errors: Vec::new(),
        })
    }

    fn sign_xmldsig(
        &self,
        document: &str,
        params: &SignatureParameters,
    ) -> Result<SignatureReport, CapabilityError> {
        self.record(format!("sign_xmldsig:{}", params.certificate))?;
        Ok(SignatureReport {
            signed_document: format!("<dsig>{document}</dsig>"),
            errors: Vec::new(),
        })
    }
}

impl SignatureValidationService for FakeEngine {
    fn validate_xades_baseline_b(
        &self,
        _document: &str,
        _params: &SignatureValidationParameters,
    ) -> Result<ValidationReport, CapabilityError> {
        self.record("validate_xades")?;
        Ok(self.validation())
    }

    fn validate_xmldsig(
        &self,
        _document: &str,
        _params: &SignatureValidationParameters,
    ) -> Result<ValidationReport, CapabilityError> {
        self.record("validate_xmldsig")?;
        Ok(self.validation())
    }
}

impl CertificateValidationService for FakeEngine {
    fn validate_certificate(
        &self,
        certificate: CertificateDocument<'_>,
        _params: &CertificateValidationParameters,
    ) -> Result<CertificateValidationReport, CapabilityError> {
        let form = match certificate {
            CertificateDocument::Binary(_) => "binary",
            CertificateDocument::Text(_) => "text",
        };
        self.record(format!("validate_certificate:{form}"))?;
        let report = self.validation();
        Ok(CertificateValidationReport {
            valid: report.valid,
            errors: report.errors,
            metadata: report.metadata,
        })
    }
}

impl ProofGenerationService for FakeEngine {
    fn signature_validation_proof(
        &self,
        _report: &ValidationReport,
        params: &ProofParameters,
    ) -> Result<String, CapabilityError> {
        self.record("signature_validation_proof")?;
        *self.proof_params.lock().unwrap() = Some(params.clone());
        Ok("<proof/>".to_string())
    }

    fn certificate_validation_proof(
        &self,
        _report: &CertificateValidationReport,
        params: &ProofParameters,
    ) -> Result<String, CapabilityError> {
        self.record("certificate_validation_proof")?;
        *self.proof_params.lock().unwrap() = Some(params.clone());
        Ok("<proof/>".to_string())
    }
}

/// Argon2id hash with small parameters, to keep tests fast.
pub fn cheap_hash(plain: &str) -> String {
    let params = Params::new(1024, 1, 1, None).unwrap();
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(plain.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

fn signature_params(certificate: &str) -> serde_json::Value {
    json!({
        "certificate": certificate,
        "password": "123456",
        "digestAlgorithm": "SHA512",
        "canonicalisationAlgorithm": "http://www.w3.org/2001/10/xml-exc-c14n#",
        "signaturePackaging": "ENVELOPED"
    })
}

/// Configuration document used by the tests.
///
/// Signing configuration `1` is open, `2` requires [`SECRET`]. Both use
/// proof configuration `1`.
pub fn config_document(extra_signature_id: Option<&str>) -> serde_json::Value {
    let mut open = signature_params(SIGN_CERT);
    open["id"] = json!("1");
    open["proofConfId"] = json!("1");

    let mut protected = signature_params(SIGN_CERT);
    protected["id"] = json!("2");
    protected["proofConfId"] = json!("1");
    protected["secret"] = json!(format!("{} {}", cheap_hash("previous"), cheap_hash(SECRET)));

    let mut signature = vec![open, protected];
    if let Some(id) = extra_signature_id {
        let mut extra = signature_params(SIGN_CERT);
        extra["id"] = json!(id);
        extra["proofConfId"] = json!("1");
        signature.push(extra);
    }

    let mut proof = signature_params(PROOF_CERT);
    proof["id"] = json!("1");

    json!({
        "signature": signature,
        "proof": [proof],
        "signatureVerification": [
            {"id": "1", "rules": "TrustedCertificat,SignatureCryptographique", "metadata": "DateSignature,RapportDSS"}
        ],
        "certificateVerification": [
            {"id": "1", "rules": "NonRevocation,ChaineDeConfiance", "metadata": "DNCertificat"}
        ],
        "ca": [
            {"id": "ACI", "certificate": "/ca/aci.pem", "crl": "/crl/aci.crl"}
        ]
    })
}

/// Write the test configuration in `dir` and return its path.
pub fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("gateway-conf.json");
    std::fs::write(&path, config_document(None).to_string()).unwrap();
    path
}

/// A gateway served on an ephemeral port, backed by a [`FakeEngine`].
pub struct TestGateway {
    pub url: String,
    pub engine: Arc<FakeEngine>,
    pub store: Arc<ConfigStore>,
    shutdown: Shutdown,
    _dir: TempDir,
}

impl TestGateway {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_gateway(secret_enabled: bool) -> TestGateway {
    spawn_gateway_with_context(secret_enabled, "").await
}

pub async fn spawn_gateway_with_context(secret_enabled: bool, context_path: &str) -> TestGateway {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ConfigStore::open(write_config(dir.path())).unwrap());
    let engine = Arc::new(FakeEngine::default());
    let orchestrator = Arc::new(Orchestrator::new(
        store.clone(),
        Capabilities::from_engine(engine.clone()),
        secret_enabled,
        context_path,
        "2.1.3",
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(&ListenerConfig::default(), orchestrator);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway {
        url: format!("http://{addr}"),
        engine,
        store,
        shutdown,
        _dir: dir,
    }
}

/// Multipart form with the given text fields and a document part.
pub fn form(fields: &[(&str, &str)], document: Option<&[u8]>) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();
    for (name, value) in fields {
        form = form.text(name.to_string(), value.to_string());
    }
    if let Some(document) = document {
        let part = reqwest::multipart::Part::bytes(document.to_vec()).file_name("document.xml");
        form = form.part("file", part);
    }
    form
}

pub async fn post_form(
    url: &str,
    fields: &[(&str, &str)],
    document: Option<&[u8]>,
) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .multipart(form(fields, document))
        .send()
        .await
        .unwrap()
}
