//! Response building.
//!
//! # Responsibilities
//! - Serialize reports as JSON with status 200
//! - Turn a [`Rejection`] into its bare status
//! - Record the outcome of every call in metrics
//!
//! # Design Decisions
//! - Rejections never carry a body; details stay in the logs

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::observability::metrics;
use crate::orchestrator::Rejection;

/// Build the response of a call named `operation` and record it.
pub fn respond<T: Serialize>(
    operation: &'static str,
    result: Result<T, Rejection>,
    start: Instant,
) -> Response {
    let response = match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(rejection) => rejection.into_response(),
    };
    let status = response.status();
    tracing::info!(
        operation,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request handled"
    );
    metrics::record_request(operation, status.as_u16(), start);
    response
}
