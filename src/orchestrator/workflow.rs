//! Workflow identities, routes and request fields.

/// Signature format, selected by route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureProfile {
    XadesBaselineB,
    XmlDsig,
}

/// The six public workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Sign(SignatureProfile),
    SignWithProof(SignatureProfile),
    Validate(SignatureProfile),
    ValidateWithProof(SignatureProfile),
    ValidateCertificate,
    ValidateCertificateWithProof,
}

impl Workflow {
    pub const ALL: [Workflow; 10] = [
        Workflow::Sign(SignatureProfile::XadesBaselineB),
        Workflow::Sign(SignatureProfile::XmlDsig),
        Workflow::SignWithProof(SignatureProfile::XadesBaselineB),
        Workflow::SignWithProof(SignatureProfile::XmlDsig),
        Workflow::Validate(SignatureProfile::XadesBaselineB),
        Workflow::Validate(SignatureProfile::XmlDsig),
        Workflow::ValidateWithProof(SignatureProfile::XadesBaselineB),
        Workflow::ValidateWithProof(SignatureProfile::XmlDsig),
        Workflow::ValidateCertificate,
        Workflow::ValidateCertificateWithProof,
    ];

    /// Route path of the workflow, also recorded in proofs.
    pub fn path(&self) -> &'static str {
        use SignatureProfile::*;
        match self {
            Workflow::Sign(XadesBaselineB) => "/signatures/xadesbaselineb",
            Workflow::Sign(XmlDsig) => "/signatures/xmldsig",
            Workflow::SignWithProof(XadesBaselineB) => "/signatures/xadesbaselinebwithproof",
            Workflow::SignWithProof(XmlDsig) => "/signatures/xmldsigwithproof",
            Workflow::Validate(XadesBaselineB) => "/validation/signatures/xadesbaselineb",
            Workflow::Validate(XmlDsig) => "/validation/signatures/xmldsig",
            Workflow::ValidateWithProof(XadesBaselineB) => {
                "/validation/signatures/xadesbaselinebwithproof"
            }
            Workflow::ValidateWithProof(XmlDsig) => "/validation/signatures/xmldsigwithproof",
            Workflow::ValidateCertificate => "/validation/certificats",
            Workflow::ValidateCertificateWithProof => "/validation/certificatswithproof",
        }
    }

    /// Label used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Workflow::Sign(_) => "sign",
            Workflow::SignWithProof(_) => "sign_with_proof",
            Workflow::Validate(_) => "validate",
            Workflow::ValidateWithProof(_) => "validate_with_proof",
            Workflow::ValidateCertificate => "validate_certificate",
            Workflow::ValidateCertificateWithProof => "validate_certificate_with_proof",
        }
    }
}

/// Fields of an inbound workflow request. Every field is optional here;
/// each workflow decides which ones it requires.
#[derive(Debug, Clone, Default)]
pub struct WorkflowRequest {
    /// Raw `Accept` header.
    pub accept: Option<String>,
    pub sign_conf_id: Option<String>,
    pub verif_sign_conf_id: Option<String>,
    pub verif_cert_conf_id: Option<String>,
    pub proof_conf_id: Option<String>,
    pub request_id: Option<String>,
    pub proof_tag: Option<String>,
    pub applicant_id: Option<String>,
    pub secret: Option<String>,
    pub document: Option<Vec<u8>>,
}

impl WorkflowRequest {
    /// Set a text field from its form name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        let slot = match name {
            "idSignConf" => &mut self.sign_conf_id,
            "idVerifSignConf" => &mut self.verif_sign_conf_id,
            "idVerifCertConf" => &mut self.verif_cert_conf_id,
            "idProofConf" => &mut self.proof_conf_id,
            "requestId" => &mut self.request_id,
            "proofTag" => &mut self.proof_tag,
            "applicantId" => &mut self.applicant_id,
            "secret" => &mut self.secret,
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
                return;
            }
        };
        *slot = Some(value);
    }
}
