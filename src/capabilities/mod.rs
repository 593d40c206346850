//! External signing engine capabilities.
//!
//! # Data Flow
//! ```text
//! Orchestrator
//!     → CaCrlService (certificate pre-flight, CA list)
//!     → SignatureService / SignatureValidationService
//!     → CertificateValidationService
//!     → ProofGenerationService
//!     → CapabilityError on failure (classified by classify::error)
//! ```
//!
//! # Design Decisions
//! - Every capability is a `Send + Sync` trait object so the engine can be
//!   swapped without touching the orchestrator
//! - Calls are synchronous; the HTTP layer runs them on the blocking pool
//! - The CA/CRL material lives behind the engine, not in the call signatures

pub mod charset;
pub mod error;
pub mod offline;
pub mod types;

use std::sync::Arc;

use crate::config::schema::{
    CertificateValidationParameters, SignatureParameters, SignatureValidationParameters,
};

pub use charset::DefaultCharsetDetector;
pub use error::{error_chain, CapabilityError};
pub use offline::OfflineEngine;
pub use types::{
    CertificateDocument, CertificateStatus, CertificateValidationReport, MetaDatum, MetadataKind,
    ProofOperation, ProofParameters, ProtocolVersion, ReportError, SignatureReport,
    ValidationReport,
};

/// Certificate authority and revocation list checks.
pub trait CaCrlService: Send + Sync {
    /// Check the signing certificate of `params` against the known CAs and CRLs.
    fn check_certificate(
        &self,
        params: &SignatureParameters,
    ) -> Result<CertificateStatus, CapabilityError>;

    /// Subject names of the trusted certificate authorities.
    fn ca_list(&self) -> Result<Vec<String>, CapabilityError>;
}

pub trait SignatureService: Send + Sync {
    fn sign_xades_baseline_b(
        &self,
        document: &str,
        params: &SignatureParameters,
    ) -> Result<SignatureReport, CapabilityError>;

    fn sign_xmldsig(
        &self,
        document: &str,
        params: &SignatureParameters,
    ) -> Result<SignatureReport, CapabilityError>;
}

pub trait SignatureValidationService: Send + Sync {
    fn validate_xades_baseline_b(
        &self,
        document: &str,
        params: &SignatureValidationParameters,
    ) -> Result<ValidationReport, CapabilityError>;

    fn validate_xmldsig(
        &self,
        document: &str,
        params: &SignatureValidationParameters,
    ) -> Result<ValidationReport, CapabilityError>;
}

pub trait CertificateValidationService: Send + Sync {
    fn validate_certificate(
        &self,
        certificate: CertificateDocument<'_>,
        params: &CertificateValidationParameters,
    ) -> Result<CertificateValidationReport, CapabilityError>;
}

/// Builds the unsigned proof document of an operation.
pub trait ProofGenerationService: Send + Sync {
    fn signature_validation_proof(
        &self,
        report: &ValidationReport,
        params: &ProofParameters,
    ) -> Result<String, CapabilityError>;

    fn certificate_validation_proof(
        &self,
        report: &CertificateValidationReport,
        params: &ProofParameters,
    ) -> Result<String, CapabilityError>;
}

/// Guesses the character set of a document and decodes it.
pub trait CharsetDetector: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<String, CapabilityError>;
}

/// The set of capabilities the orchestrator is wired with.
#[derive(Clone)]
pub struct Capabilities {
    pub ca_crl: Arc<dyn CaCrlService>,
    pub signature: Arc<dyn SignatureService>,
    pub signature_validation: Arc<dyn SignatureValidationService>,
    pub certificate_validation: Arc<dyn CertificateValidationService>,
    pub proof_generation: Arc<dyn ProofGenerationService>,
    pub charset: Arc<dyn CharsetDetector>,
}

impl Capabilities {
    /// Wire every capability to one engine, with the default charset detector.
    pub fn from_engine<E>(engine: Arc<E>) -> Self
    where
        E: CaCrlService
            + SignatureService
            + SignatureValidationService
            + CertificateValidationService
            + ProofGenerationService
            + 'static,
    {
        Self {
            ca_crl: engine.clone(),
            signature: engine.clone(),
            signature_validation: engine.clone(),
            certificate_validation: engine.clone(),
            proof_generation: engine,
            charset: Arc::new(DefaultCharsetDetector),
        }
    }

    pub fn with_charset(mut self, charset: Arc<dyn CharsetDetector>) -> Self {
        self.charset = charset;
        self
    }
}
