//! Configuration document schema.
//!
//! The gateway configuration is a JSON document with five named arrays.
//! Each entry carries an `id` used for lookups; the remaining fields are the
//! parameters handed to the signing engine.

use serde::{Deserialize, Serialize};

/// Root of the configuration document.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// Signing configurations.
    #[serde(default)]
    pub signature: Vec<SignatureConf>,

    /// Proof signing configurations.
    #[serde(default)]
    pub proof: Vec<ProofConf>,

    /// Signature verification configurations.
    #[serde(default)]
    pub signature_verification: Vec<SignVerifConf>,

    /// Certificate verification configurations.
    #[serde(default)]
    pub certificate_verification: Vec<CertVerifConf>,

    /// Trusted certificate authorities and their revocation lists.
    #[serde(default)]
    pub ca: Vec<CaConf>,
}

/// Signature packaging mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignaturePackaging {
    Enveloped,
    Enveloping,
    Detached,
}

/// Parameters used to produce a signature (document or proof).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureParameters {
    /// Path or alias of the PKCS#12 keystore holding the signing certificate.
    pub certificate: String,

    /// Keystore password.
    pub password: String,

    /// Digest algorithm (e.g. "SHA512").
    pub digest_algorithm: String,

    /// Canonicalisation algorithm URI.
    pub canonicalisation_algorithm: String,

    /// Signature packaging.
    pub signature_packaging: SignaturePackaging,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_value_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    /// XPath-like pattern locating where an enveloped signature is placed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_placement_pattern: Option<String>,
}

/// Rules and metadata requested from a signature validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureValidationParameters {
    /// Comma-separated validation rules.
    pub rules: String,

    /// Comma-separated metadata kinds to return.
    #[serde(default)]
    pub metadata: String,
}

/// Rules and metadata requested from a certificate validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateValidationParameters {
    /// Comma-separated validation rules.
    pub rules: String,

    /// Comma-separated metadata kinds to return.
    #[serde(default)]
    pub metadata: String,
}

/// Splits a comma-separated parameter list, trimming each item.
pub fn split_list(raw: &str) -> Vec<&str> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::trim).collect()
}

impl SignatureValidationParameters {
    pub fn rule_list(&self) -> Vec<&str> {
        split_list(&self.rules)
    }

    pub fn metadata_list(&self) -> Vec<&str> {
        split_list(&self.metadata)
    }
}

impl CertificateValidationParameters {
    pub fn rule_list(&self) -> Vec<&str> {
        split_list(&self.rules)
    }

    pub fn metadata_list(&self) -> Vec<&str> {
        split_list(&self.metadata)
    }
}

/// A signing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureConf {
    pub id: String,

    /// Id of the proof configuration used when signing with proof.
    pub proof_conf_id: String,

    /// Whitespace-separated Argon2 hashes; empty or absent disables the check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub sign_params: SignatureParameters,
}

/// A proof signing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofConf {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub sign_proof_params: SignatureParameters,
}

/// A signature verification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignVerifConf {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub sign_verif_params: SignatureValidationParameters,
}

/// A certificate verification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertVerifConf {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub cert_verif_params: CertificateValidationParameters,
}

/// A trusted certificate authority.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaConf {
    pub id: String,

    /// Path of the CA certificate bundle.
    pub certificate: String,

    /// Path or URL of the certificate revocation list.
    pub crl: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
