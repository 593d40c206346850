//! Reports exchanged with the signing engine, and proof parameters.
//!
//! Reports are produced per request by the engine and consumed once by the
//! orchestrator; nothing here is cached.

use std::fmt;
use std::str::FromStr;

/// One error reported by the engine, code and message kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportError {
    pub code: String,
    pub message: String,
}

impl ReportError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Kind of a metadata entry returned by a validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataKind {
    DateSignature,
    DnCertificat,
    RapportDiagnostique,
    DocumentOriginalNonSigne,
    RapportDss,
    Other(String),
}

impl MetadataKind {
    pub fn name(&self) -> &str {
        match self {
            MetadataKind::DateSignature => "DATE_SIGNATURE",
            MetadataKind::DnCertificat => "DN_CERTIFICAT",
            MetadataKind::RapportDiagnostique => "RAPPORT_DIAGNOSTIQUE",
            MetadataKind::DocumentOriginalNonSigne => "DOCUMENT_ORIGINAL_NON_SIGNE",
            MetadataKind::RapportDss => "RAPPORT_DSS",
            MetadataKind::Other(name) => name,
        }
    }

    /// Kinds whose value is a document and goes out base64-encoded.
    pub fn is_binary_payload(&self) -> bool {
        matches!(
            self,
            MetadataKind::RapportDiagnostique
                | MetadataKind::DocumentOriginalNonSigne
                | MetadataKind::RapportDss
        )
    }
}

impl From<&str> for MetadataKind {
    fn from(name: &str) -> Self {
        match name {
            "DATE_SIGNATURE" => MetadataKind::DateSignature,
            "DN_CERTIFICAT" => MetadataKind::DnCertificat,
            "RAPPORT_DIAGNOSTIQUE" => MetadataKind::RapportDiagnostique,
            "DOCUMENT_ORIGINAL_NON_SIGNE" => MetadataKind::DocumentOriginalNonSigne,
            "RAPPORT_DSS" => MetadataKind::RapportDss,
            other => MetadataKind::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDatum {
    pub kind: MetadataKind,
    pub value: String,
}

impl MetaDatum {
    pub fn new(kind: MetadataKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Result of signing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureReport {
    pub signed_document: String,
    pub errors: Vec<ReportError>,
}

/// Result of validating a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ReportError>,
    pub metadata: Vec<MetaDatum>,
}

/// Result of validating a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateValidationReport {
    pub valid: bool,
    pub errors: Vec<ReportError>,
    pub metadata: Vec<MetaDatum>,
}

/// Certificate content as handed to the certificate validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateDocument<'a> {
    /// DER or other binary encoding, passed through untouched.
    Binary(&'a [u8]),
    /// PEM or other text encoding, already decoded.
    Text(&'a str),
}

/// Outcome of the certificate pre-flight check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateStatus {
    Continue,
    Reject(crate::orchestrator::Rejection),
}

/// Operation recorded in a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofOperation {
    Sign,
    VerifCert,
}

impl ProofOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofOperation::Sign => "Sign",
            ProofOperation::VerifCert => "VerifCert",
        }
    }
}

/// Four-part protocol version written into proofs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: u32,
}

impl ProtocolVersion {
    pub const DEFAULT: ProtocolVersion = ProtocolVersion {
        major: 2,
        minor: 0,
        patch: 0,
        build: 0,
    };

    /// Parse a build version, falling back to [`ProtocolVersion::DEFAULT`].
    pub fn from_build(version: &str) -> Self {
        version.parse().unwrap_or_else(|e: ParseVersionError| {
            tracing::error!(version, error = %e, "Unparsable build version, using default");
            Self::DEFAULT
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid version '{0}'")]
pub struct ParseVersionError(String);

impl FromStr for ProtocolVersion {
    type Err = ParseVersionError;

    /// Accepts `major.minor.patch[.build]` with an optional `-suffix`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let core = s.split(['-', '+']).next().unwrap_or_default();
        let parts = core
            .split('.')
            .map(str::parse::<u32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseVersionError(s.to_string()))?;

        match parts.as_slice() {
            [major, minor, patch] => Ok(Self {
                major: *major,
                minor: *minor,
                patch: *patch,
                build: 0,
            }),
            [major, minor, patch, build] => Ok(Self {
                major: *major,
                minor: *minor,
                patch: *patch,
                build: *build,
            }),
            _ => Err(ParseVersionError(s.to_string())),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.build)
    }
}

/// Parameters of a proof, built per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofParameters {
    pub operation: ProofOperation,
    pub request_id: String,
    pub proof_tag: String,
    pub applicant_id: String,
    /// Path of the called operation, context path included.
    pub called_operation: String,
    pub version: ProtocolVersion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        let v: ProtocolVersion = "2.3.1".parse().unwrap();
        assert_eq!(v.to_string(), "2.3.1.0");

        let v: ProtocolVersion = "2.3.1.7".parse().unwrap();
        assert_eq!(v.build, 7);

        let v: ProtocolVersion = "2.4.0-SNAPSHOT".parse().unwrap();
        assert_eq!(v.to_string(), "2.4.0.0");

        assert!("2.x".parse::<ProtocolVersion>().is_err());
        assert!("2".parse::<ProtocolVersion>().is_err());
    }

    #[test]
    fn test_version_fallback() {
        assert_eq!(ProtocolVersion::from_build("garbage"), ProtocolVersion::DEFAULT);
        assert_eq!(ProtocolVersion::DEFAULT.to_string(), "2.0.0.0");
    }

    #[test]
    fn test_metadata_kinds() {
        assert!(MetadataKind::from("RAPPORT_DSS").is_binary_payload());
        assert!(MetadataKind::from("RAPPORT_DIAGNOSTIQUE").is_binary_payload());
        assert!(MetadataKind::from("DOCUMENT_ORIGINAL_NON_SIGNE").is_binary_payload());
        assert!(!MetadataKind::from("DATE_SIGNATURE").is_binary_payload());

        let other = MetadataKind::from("CUSTOM");
        assert_eq!(other.name(), "CUSTOM");
        assert!(!other.is_binary_payload());
    }
}
