//! Terminal outcomes of a workflow.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::capabilities::CapabilityError;
use crate::classify;

/// A workflow that stops early ends with exactly one of these. Rejections
/// carry no body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Missing or unreadable request fields.
    BadRequest,
    /// Caller secret matches none of the configured hashes.
    Unauthorized,
    /// A configuration id is unknown.
    NotFound,
    /// Unsupported media type, or the engine rejected the input.
    NotImplemented,
    /// The engine or one of its dependencies is unreachable.
    ServiceUnavailable,
    InternalServerError,
}

impl Rejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Rejection::BadRequest => StatusCode::BAD_REQUEST,
            Rejection::Unauthorized => StatusCode::UNAUTHORIZED,
            Rejection::NotFound => StatusCode::NOT_FOUND,
            Rejection::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Rejection::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Rejection::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CapabilityError> for Rejection {
    fn from(err: CapabilityError) -> Self {
        classify::classify(&err)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        self.status_code().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Rejection::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Rejection::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Rejection::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Rejection::NotImplemented.status_code(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            Rejection::ServiceUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_capability_errors_convert() {
        let rejection: Rejection = CapabilityError::server("down").into();
        assert_eq!(rejection, Rejection::ServiceUnavailable);
    }
}
