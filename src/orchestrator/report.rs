//! JSON reports returned to callers.
//!
//! Wire names follow the published API (French field names). Signed and
//! proof payloads are always base64-encoded; metadata values are encoded
//! only for the kinds that carry a document.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::capabilities::{
    CertificateValidationReport, MetaDatum, ReportError, SignatureReport, ValidationReport,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    #[serde(rename = "codeErreur")]
    pub code: String,
    pub message: String,
}

impl From<ReportError> for ErrorEntry {
    fn from(e: ReportError) -> Self {
        Self {
            code: e.code,
            message: e.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataEntry {
    #[serde(rename = "typeMetadata")]
    pub kind: String,
    pub message: String,
}

impl From<MetaDatum> for MetadataEntry {
    fn from(m: MetaDatum) -> Self {
        let message = if m.kind.is_binary_payload() {
            STANDARD.encode(m.value.as_bytes())
        } else {
            m.value
        };
        Self {
            kind: m.kind.name().to_string(),
            message,
        }
    }
}

fn errors(list: Vec<ReportError>) -> Vec<ErrorEntry> {
    list.into_iter().map(ErrorEntry::from).collect()
}

fn metadata(list: Vec<MetaDatum>) -> Vec<MetadataEntry> {
    list.into_iter().map(MetadataEntry::from).collect()
}

fn encode(payload: &str) -> String {
    STANDARD.encode(payload.as_bytes())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureResponse {
    #[serde(rename = "docSigne")]
    pub signed_document: String,
    #[serde(rename = "erreurs")]
    pub errors: Vec<ErrorEntry>,
}

impl From<SignatureReport> for SignatureResponse {
    fn from(report: SignatureReport) -> Self {
        Self {
            signed_document: encode(&report.signed_document),
            errors: errors(report.errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureWithProofResponse {
    #[serde(rename = "valide")]
    pub valid: bool,
    #[serde(rename = "docSigne")]
    pub signed_document: String,
    #[serde(rename = "preuve")]
    pub proof: String,
    #[serde(rename = "erreurs")]
    pub errors: Vec<ErrorEntry>,
    #[serde(rename = "metaData")]
    pub metadata: Vec<MetadataEntry>,
}

impl SignatureWithProofResponse {
    /// Errors and metadata come from the validation of the signed document.
    pub fn new(validation: ValidationReport, signed_document: &str, signed_proof: &str) -> Self {
        Self {
            valid: validation.valid,
            signed_document: encode(signed_document),
            proof: encode(signed_proof),
            errors: errors(validation.errors),
            metadata: metadata(validation.metadata),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResponse {
    #[serde(rename = "valide")]
    pub valid: bool,
    #[serde(rename = "erreurs")]
    pub errors: Vec<ErrorEntry>,
    #[serde(rename = "metaData")]
    pub metadata: Vec<MetadataEntry>,
}

impl From<ValidationReport> for ValidationResponse {
    fn from(report: ValidationReport) -> Self {
        Self {
            valid: report.valid,
            errors: errors(report.errors),
            metadata: metadata(report.metadata),
        }
    }
}

impl From<CertificateValidationReport> for ValidationResponse {
    fn from(report: CertificateValidationReport) -> Self {
        Self {
            valid: report.valid,
            errors: errors(report.errors),
            metadata: metadata(report.metadata),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWithProofResponse {
    #[serde(rename = "valide")]
    pub valid: bool,
    #[serde(rename = "preuve")]
    pub proof: String,
    #[serde(rename = "erreurs")]
    pub errors: Vec<ErrorEntry>,
    #[serde(rename = "metaData")]
    pub metadata: Vec<MetadataEntry>,
}

impl ValidationWithProofResponse {
    pub fn new(validation: impl Into<ValidationResponse>, signed_proof: &str) -> Self {
        let ValidationResponse {
            valid,
            errors,
            metadata,
        } = validation.into();
        Self {
            valid,
            proof: encode(signed_proof),
            errors,
            metadata,
        }
    }
}

/// Report of any workflow, serialized without a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WorkflowReport {
    Signature(SignatureResponse),
    SignatureWithProof(SignatureWithProofResponse),
    Validation(ValidationResponse),
    ValidationWithProof(ValidationWithProofResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::MetadataKind;
    use serde_json::json;

    #[test]
    fn test_validation_wire_format() {
        let report = ValidationReport {
            valid: false,
            errors: vec![ReportError::new("ERR_SIG_01", "Signature invalide")],
            metadata: vec![
                MetaDatum::new(MetadataKind::DateSignature, "2024-01-01T00:00:00Z"),
                MetaDatum::new(MetadataKind::RapportDss, "<r/>"),
            ],
        };
        let body = serde_json::to_value(ValidationResponse::from(report)).unwrap();
        assert_eq!(
            body,
            json!({
                "valide": false,
                "erreurs": [{"codeErreur": "ERR_SIG_01", "message": "Signature invalide"}],
                "metaData": [
                    {"typeMetadata": "DATE_SIGNATURE", "message": "2024-01-01T00:00:00Z"},
                    {"typeMetadata": "RAPPORT_DSS", "message": "PHIvPg=="}
                ]
            })
        );
    }

    #[test]
    fn test_signature_payload_is_encoded() {
        let response = SignatureResponse::from(SignatureReport {
            signed_document: "<doc/>".into(),
            errors: Vec::new(),
        });
        let body = serde_json::to_value(WorkflowReport::Signature(response)).unwrap();
        assert_eq!(body, json!({"docSigne": "PGRvYy8+", "erreurs": []}));
    }

    #[test]
    fn test_proof_response_keeps_validation_outcome() {
        let validation = ValidationReport {
            valid: true,
            errors: Vec::new(),
            metadata: Vec::new(),
        };
        let response = SignatureWithProofResponse::new(validation, "<doc/>", "<proof/>");
        assert!(response.valid);
        assert_eq!(response.proof, STANDARD.encode("<proof/>"));
    }
}
