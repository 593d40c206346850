//! Workflow guards.
//!
//! Each guard either yields what it resolved or stops the workflow with a
//! [`Rejection`]. Workflows chain them in a fixed order with `?`.

use crate::capabilities::{CaCrlService, CertificateStatus};
use crate::config::schema::{SignatureConf, SignatureParameters};
use crate::config::validation::EntryKind;
use crate::orchestrator::{Rejection, WorkflowRequest};
use crate::security::secrets;

/// Media type every workflow answers with.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Proof fields of a request, all present.
#[derive(Debug, Clone, Copy)]
pub struct ProofFields<'a> {
    pub request_id: &'a str,
    pub proof_tag: &'a str,
    pub applicant_id: &'a str,
}

/// Resolve a configuration id. A missing id is a malformed request, an
/// unknown one is `NotFound`.
pub fn resolve<'a, T: 'a>(
    id: Option<&str>,
    kind: EntryKind,
    lookup: impl FnOnce(&str) -> Option<&'a T>,
) -> Result<&'a T, Rejection> {
    let Some(id) = id else {
        tracing::warn!(kind = %kind, "Configuration id missing from request");
        return Err(Rejection::BadRequest);
    };
    lookup(id).ok_or_else(|| {
        tracing::error!(kind = %kind, id, "Configuration not found");
        Rejection::NotFound
    })
}

pub fn accept_json(accept: Option<&str>) -> Result<(), Rejection> {
    match accept {
        Some(value) if value.contains(JSON_MEDIA_TYPE) => Ok(()),
        _ => {
            tracing::warn!(accept = ?accept, "Accept header does not allow JSON");
            Err(Rejection::NotImplemented)
        }
    }
}

pub fn require_document(document: Option<&[u8]>) -> Result<&[u8], Rejection> {
    document.ok_or_else(|| {
        tracing::warn!("Document missing from request");
        Rejection::BadRequest
    })
}

pub fn require_proof_fields(req: &WorkflowRequest) -> Result<ProofFields<'_>, Rejection> {
    match (&req.request_id, &req.proof_tag, &req.applicant_id) {
        (Some(request_id), Some(proof_tag), Some(applicant_id)) => Ok(ProofFields {
            request_id,
            proof_tag,
            applicant_id,
        }),
        _ => {
            tracing::warn!("Proof parameters missing from request");
            Err(Rejection::BadRequest)
        }
    }
}

/// Only enforced when secret protection is enabled process-wide.
pub fn check_secret(
    enabled: bool,
    conf: &SignatureConf,
    candidate: Option<&str>,
) -> Result<(), Rejection> {
    if enabled && secrets::no_secret_match(conf.secret.as_deref(), candidate) {
        tracing::error!(id = %conf.id, "Secret does not match signing configuration");
        return Err(Rejection::Unauthorized);
    }
    Ok(())
}

/// Pre-flight check of a signing certificate. A non-continue status is
/// returned as is.
pub fn check_certificate(
    ca_crl: &dyn CaCrlService,
    params: &SignatureParameters,
) -> Result<(), Rejection> {
    match ca_crl.check_certificate(params)? {
        CertificateStatus::Continue => Ok(()),
        CertificateStatus::Reject(rejection) => {
            tracing::error!(
                certificate = %params.certificate,
                status = %rejection.status_code(),
                "Signing certificate rejected"
            );
            Err(rejection)
        }
    }
}
