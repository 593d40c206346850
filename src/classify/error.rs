//! Mapping of capability failures to outcomes.

use crate::capabilities::{error_chain, CapabilityError};
use crate::observability::metrics;
use crate::orchestrator::Rejection;

/// Classify a capability failure. The full source chain is logged; callers
/// only ever see the resulting status.
pub fn classify(err: &CapabilityError) -> Rejection {
    tracing::error!(kind = err.kind(), error = %error_chain(err), "Signing engine call failed");
    metrics::record_capability_failure(err.kind());

    match err {
        CapabilityError::Client(_) => Rejection::NotImplemented,
        CapabilityError::Server(_) => Rejection::ServiceUnavailable,
        CapabilityError::Processing(_) => Rejection::InternalServerError,
    }
}
