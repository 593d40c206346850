//! Engine used when no signing engine is attached.
//!
//! Every cryptographic call fails as a server-side failure, so requests that
//! reach the engine end with 503. The CA list is answered from the `ca`
//! entries of the live configuration.

use std::sync::Arc;

use crate::capabilities::{
    CaCrlService, CapabilityError, CertificateDocument, CertificateStatus,
    CertificateValidationReport, CertificateValidationService, ProofGenerationService,
    ProofParameters, SignatureReport, SignatureService, SignatureValidationService,
    ValidationReport,
};
use crate::config::schema::{
    CertificateValidationParameters, SignatureParameters, SignatureValidationParameters,
};
use crate::config::ConfigStore;

const DETACHED: &str = "signing engine not attached";

pub struct OfflineEngine {
    store: Arc<ConfigStore>,
}

impl OfflineEngine {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    fn unavailable<T>(&self, operation: &'static str) -> Result<T, CapabilityError> {
        tracing::warn!(operation, "Signing engine call refused, no engine attached");
        Err(CapabilityError::server(DETACHED))
    }
}

impl CaCrlService for OfflineEngine {
    fn check_certificate(
        &self,
        _params: &SignatureParameters,
    ) -> Result<CertificateStatus, CapabilityError> {
        self.unavailable("check_certificate")
    }

    fn ca_list(&self) -> Result<Vec<String>, CapabilityError> {
        let snapshot = self.store.current();
        Ok(snapshot.document().ca.iter().map(|ca| ca.id.clone()).collect())
    }
}

impl SignatureService for OfflineEngine {
    fn sign_xades_baseline_b(
        &self,
        _document: &str,
        _params: &SignatureParameters,
    ) -> Result<SignatureReport, CapabilityError> {
        self.unavailable("sign_xades_baseline_b")
    }

    fn sign_xmldsig(
        &self,
        _document: &str,
        _params: &SignatureParameters,
    ) -> Result<SignatureReport, CapabilityError> {
        self.unavailable("sign_xmldsig")
    }
}

impl SignatureValidationService for OfflineEngine {
    fn validate_xades_baseline_b(
        &self,
        _document: &str,
        _params: &SignatureValidationParameters,
    ) -> Result<ValidationReport, CapabilityError> {
        self.unavailable("validate_xades_baseline_b")
    }

    fn validate_xmldsig(
        &self,
        _document: &str,
        _params: &SignatureValidationParameters,
    ) -> Result<ValidationReport, CapabilityError> {
        self.unavailable("validate_xmldsig")
    }
}

impl CertificateValidationService for OfflineEngine {
    fn validate_certificate(
        &self,
        _certificate: CertificateDocument<'_>,
        _params: &CertificateValidationParameters,
    ) -> Result<CertificateValidationReport, CapabilityError> {
        self.unavailable("validate_certificate")
    }
}

impl ProofGenerationService for OfflineEngine {
    fn signature_validation_proof(
        &self,
        _report: &ValidationReport,
        _params: &ProofParameters,
    ) -> Result<String, CapabilityError> {
        self.unavailable("signature_validation_proof")
    }

    fn certificate_validation_proof(
        &self,
        _report: &CertificateValidationReport,
        _params: &ProofParameters,
    ) -> Result<String, CapabilityError> {
        self.unavailable("certificate_validation_proof")
    }
}
