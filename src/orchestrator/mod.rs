//! Workflow orchestration.
//!
//! # Data Flow
//! ```text
//! WorkflowRequest
//!     → resolve configuration ids against one snapshot   (NotFound)
//!     → Accept must allow application/json               (NotImplemented)
//!     → request shape                                    (BadRequest)
//!     → secret check, sign workflows only                (Unauthorized)
//!     → certificate pre-flight check of the signer
//!     → sign or validate
//!     → [proof] generate → check proof certificate → sign proof
//!     → report
//! ```
//!
//! Capability failures are classified by `classify::error` through the
//! `From<CapabilityError>` conversion on [`Rejection`], so every engine call
//! is simply followed by `?`.
//!
//! # Design Decisions
//! - Synchronous; the HTTP layer runs workflows on the blocking pool
//! - A request reads the published snapshot once, so all of its lookups see
//!   the same configuration generation

pub mod guards;
pub mod rejection;
pub mod report;
pub mod workflow;

use std::sync::Arc;

use crate::capabilities::{
    Capabilities, CertificateDocument, CertificateValidationReport, ProofOperation,
    ProofParameters, ProtocolVersion, SignatureReport, ValidationReport,
};
use crate::classify::content;
use crate::config::schema::{
    CertificateValidationParameters, SignatureParameters, SignatureValidationParameters,
};
use crate::config::validation::EntryKind;
use crate::config::ConfigStore;

use guards::ProofFields;
pub use rejection::Rejection;
pub use report::{
    SignatureResponse, SignatureWithProofResponse, ValidationResponse,
    ValidationWithProofResponse, WorkflowReport,
};
pub use workflow::{SignatureProfile, Workflow, WorkflowRequest};

/// Runs the public workflows against the live configuration.
pub struct Orchestrator {
    store: Arc<ConfigStore>,
    capabilities: Capabilities,
    secret_enabled: bool,
    context_path: String,
    version: ProtocolVersion,
}

impl Orchestrator {
    pub fn new(
        store: Arc<ConfigStore>,
        capabilities: Capabilities,
        secret_enabled: bool,
        context_path: impl Into<String>,
        build_version: &str,
    ) -> Self {
        Self {
            store,
            capabilities,
            secret_enabled,
            context_path: context_path.into(),
            version: ProtocolVersion::from_build(build_version),
        }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Run `workflow` on `req`.
    pub fn run(&self, workflow: Workflow, req: &WorkflowRequest) -> Result<WorkflowReport, Rejection> {
        let report = match workflow {
            Workflow::Sign(profile) => WorkflowReport::Signature(self.sign(profile, req)?),
            Workflow::SignWithProof(profile) => {
                WorkflowReport::SignatureWithProof(self.sign_with_proof(profile, req)?)
            }
            Workflow::Validate(profile) => WorkflowReport::Validation(self.validate(profile, req)?),
            Workflow::ValidateWithProof(profile) => {
                WorkflowReport::ValidationWithProof(self.validate_with_proof(profile, req)?)
            }
            Workflow::ValidateCertificate => {
                WorkflowReport::Validation(self.validate_certificate(req)?)
            }
            Workflow::ValidateCertificateWithProof => {
                WorkflowReport::ValidationWithProof(self.validate_certificate_with_proof(req)?)
            }
        };
        tracing::info!(workflow = workflow.name(), path = workflow.path(), "Workflow completed");
        Ok(report)
    }

    pub fn sign(
        &self,
        profile: SignatureProfile,
        req: &WorkflowRequest,
    ) -> Result<SignatureResponse, Rejection> {
        let snapshot = self.store.current();
        let conf = guards::resolve(req.sign_conf_id.as_deref(), EntryKind::Signature, |id| {
            snapshot.signature_by_id(id)
        })?;
        guards::accept_json(req.accept.as_deref())?;
        let document = guards::require_document(req.document.as_deref())?;
        guards::check_secret(self.secret_enabled, conf, req.secret.as_deref())?;
        guards::check_certificate(self.capabilities.ca_crl.as_ref(), &conf.sign_params)?;

        let text = String::from_utf8_lossy(document);
        let report = self.sign_document(profile, &text, &conf.sign_params)?;
        Ok(report.into())
    }

    pub fn sign_with_proof(
        &self,
        profile: SignatureProfile,
        req: &WorkflowRequest,
    ) -> Result<SignatureWithProofResponse, Rejection> {
        let snapshot = self.store.current();
        let sign_conf = guards::resolve(req.sign_conf_id.as_deref(), EntryKind::Signature, |id| {
            snapshot.signature_by_id(id)
        })?;
        let verif_conf = guards::resolve(
            req.verif_sign_conf_id.as_deref(),
            EntryKind::SignatureVerification,
            |id| snapshot.signature_verification_by_id(id),
        )?;
        let proof_conf = guards::resolve(Some(sign_conf.proof_conf_id.as_str()), EntryKind::Proof, |id| {
            snapshot.proof_by_id(id)
        })?;
        guards::accept_json(req.accept.as_deref())?;
        let document = guards::require_document(req.document.as_deref())?;
        let fields = guards::require_proof_fields(req)?;
        guards::check_secret(self.secret_enabled, sign_conf, req.secret.as_deref())?;
        guards::check_certificate(self.capabilities.ca_crl.as_ref(), &sign_conf.sign_params)?;

        let text = String::from_utf8_lossy(document);
        let signed = self.sign_document(profile, &text, &sign_conf.sign_params)?;
        let validation =
            self.validate_document(profile, &signed.signed_document, &verif_conf.sign_verif_params)?;

        let params = self.proof_parameters(
            ProofOperation::Sign,
            fields,
            Workflow::SignWithProof(profile),
        );
        let proof = self
            .capabilities
            .proof_generation
            .signature_validation_proof(&validation, &params)?;
        guards::check_certificate(self.capabilities.ca_crl.as_ref(), &proof_conf.sign_proof_params)?;
        let signed_proof = self
            .capabilities
            .signature
            .sign_xades_baseline_b(&proof, &proof_conf.sign_proof_params)?;

        Ok(SignatureWithProofResponse::new(
            validation,
            &signed.signed_document,
            &signed_proof.signed_document,
        ))
    }

    pub fn validate(
        &self,
        profile: SignatureProfile,
        req: &WorkflowRequest,
    ) -> Result<ValidationResponse, Rejection> {
        let snapshot = self.store.current();
        let conf = guards::resolve(
            req.verif_sign_conf_id.as_deref(),
            EntryKind::SignatureVerification,
            |id| snapshot.signature_verification_by_id(id),
        )?;
        guards::accept_json(req.accept.as_deref())?;
        let document = guards::require_document(req.document.as_deref())?;

        let text = self.capabilities.charset.decode(document)?;
        let report = self.validate_document(profile, &text, &conf.sign_verif_params)?;
        Ok(report.into())
    }

    pub fn validate_with_proof(
        &self,
        profile: SignatureProfile,
        req: &WorkflowRequest,
    ) -> Result<ValidationWithProofResponse, Rejection> {
        let snapshot = self.store.current();
        let verif_conf = guards::resolve(
            req.verif_sign_conf_id.as_deref(),
            EntryKind::SignatureVerification,
            |id| snapshot.signature_verification_by_id(id),
        )?;
        let proof_conf = guards::resolve(req.proof_conf_id.as_deref(), EntryKind::Proof, |id| {
            snapshot.proof_by_id(id)
        })?;
        guards::accept_json(req.accept.as_deref())?;
        let document = guards::require_document(req.document.as_deref())?;
        let fields = guards::require_proof_fields(req)?;

        let text = self.capabilities.charset.decode(document)?;
        let validation = self.validate_document(profile, &text, &verif_conf.sign_verif_params)?;

        let params = self.proof_parameters(
            ProofOperation::Sign,
            fields,
            Workflow::ValidateWithProof(profile),
        );
        let proof = self
            .capabilities
            .proof_generation
            .signature_validation_proof(&validation, &params)?;
        guards::check_certificate(self.capabilities.ca_crl.as_ref(), &proof_conf.sign_proof_params)?;
        let signed_proof = self
            .capabilities
            .signature
            .sign_xmldsig(&proof, &proof_conf.sign_proof_params)?;

        Ok(ValidationWithProofResponse::new(validation, &signed_proof.signed_document))
    }

    pub fn validate_certificate(&self, req: &WorkflowRequest) -> Result<ValidationResponse, Rejection> {
        let snapshot = self.store.current();
        let conf = guards::resolve(
            req.verif_cert_conf_id.as_deref(),
            EntryKind::CertificateVerification,
            |id| snapshot.certificate_verification_by_id(id),
        )?;
        guards::accept_json(req.accept.as_deref())?;
        let document = guards::require_document(req.document.as_deref())?;

        let report = self.validate_certificate_document(document, &conf.cert_verif_params)?;
        Ok(report.into())
    }

    pub fn validate_certificate_with_proof(
        &self,
        req: &WorkflowRequest,
    ) -> Result<ValidationWithProofResponse, Rejection> {
        let snapshot = self.store.current();
        let verif_conf = guards::resolve(
            req.verif_cert_conf_id.as_deref(),
            EntryKind::CertificateVerification,
            |id| snapshot.certificate_verification_by_id(id),
        )?;
        let proof_conf = guards::resolve(req.proof_conf_id.as_deref(), EntryKind::Proof, |id| {
            snapshot.proof_by_id(id)
        })?;
        guards::accept_json(req.accept.as_deref())?;
        let document = guards::require_document(req.document.as_deref())?;
        let fields = guards::require_proof_fields(req)?;

        let validation =
            self.validate_certificate_document(document, &verif_conf.cert_verif_params)?;

        let params = self.proof_parameters(
            ProofOperation::VerifCert,
            fields,
            Workflow::ValidateCertificateWithProof,
        );
        let proof = self
            .capabilities
            .proof_generation
            .certificate_validation_proof(&validation, &params)?;
        guards::check_certificate(self.capabilities.ca_crl.as_ref(), &proof_conf.sign_proof_params)?;
        let signed_proof = self
            .capabilities
            .signature
            .sign_xades_baseline_b(&proof, &proof_conf.sign_proof_params)?;

        Ok(ValidationWithProofResponse::new(validation, &signed_proof.signed_document))
    }

    /// Names of the trusted certificate authorities.
    pub fn ca_list(&self, accept: Option<&str>) -> Result<Vec<String>, Rejection> {
        guards::accept_json(accept)?;
        Ok(self.capabilities.ca_crl.ca_list()?)
    }

    fn sign_document(
        &self,
        profile: SignatureProfile,
        document: &str,
        params: &SignatureParameters,
    ) -> Result<SignatureReport, Rejection> {
        let signature = &self.capabilities.signature;
        let report = match profile {
            SignatureProfile::XadesBaselineB => signature.sign_xades_baseline_b(document, params)?,
            SignatureProfile::XmlDsig => signature.sign_xmldsig(document, params)?,
        };
        Ok(report)
    }

    fn validate_document(
        &self,
        profile: SignatureProfile,
        document: &str,
        params: &SignatureValidationParameters,
    ) -> Result<ValidationReport, Rejection> {
        let validation = &self.capabilities.signature_validation;
        let report = match profile {
            SignatureProfile::XadesBaselineB => validation.validate_xades_baseline_b(document, params)?,
            SignatureProfile::XmlDsig => validation.validate_xmldsig(document, params)?,
        };
        Ok(report)
    }

    /// Binary certificates go to the validator untouched, text ones decoded.
    fn validate_certificate_document(
        &self,
        document: &[u8],
        params: &CertificateValidationParameters,
    ) -> Result<CertificateValidationReport, Rejection> {
        let validator = &self.capabilities.certificate_validation;
        let report = if content::is_binary(document) {
            validator.validate_certificate(CertificateDocument::Binary(document), params)?
        } else {
            let text = self.capabilities.charset.decode(document)?;
            validator.validate_certificate(CertificateDocument::Text(&text), params)?
        };
        Ok(report)
    }

    fn proof_parameters(
        &self,
        operation: ProofOperation,
        fields: ProofFields<'_>,
        workflow: Workflow,
    ) -> ProofParameters {
        ProofParameters {
            operation,
            request_id: fields.request_id.to_string(),
            proof_tag: fields.proof_tag.to_string(),
            applicant_id: fields.applicant_id.to_string(),
            called_operation: format!("{}{}", self.context_path, workflow.path()),
            version: self.version,
        }
    }
}
