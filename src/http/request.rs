//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Decode the multipart form of a workflow call into a [`WorkflowRequest`]
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An unreadable form is a malformed request, never a server error

use axum::extract::Multipart;
use axum::http::{header, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::orchestrator::{Rejection, WorkflowRequest};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Name of the form part carrying the document.
pub const DOCUMENT_PART: &str = "file";

/// Makes a fresh UUID v4 request id.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request id of an inbound request, as set by the request id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Read every part of a workflow form.
///
/// Text parts fill the matching fields; the `file` part is kept as raw
/// bytes. The `Accept` header is carried along for the media type guard.
pub async fn read_workflow_request(
    headers: &HeaderMap,
    mut form: Multipart,
) -> Result<WorkflowRequest, Rejection> {
    let mut req = WorkflowRequest {
        accept: headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ..WorkflowRequest::default()
    };

    while let Some(field) = form.next_field().await.map_err(unreadable)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == DOCUMENT_PART {
            let bytes = field.bytes().await.map_err(unreadable)?;
            req.document = Some(bytes.to_vec());
        } else {
            let value = field.text().await.map_err(unreadable)?;
            req.set_field(&name, value);
        }
    }

    Ok(req)
}

fn unreadable(err: axum::extract::multipart::MultipartError) -> Rejection {
    tracing::warn!(error = %err, "Unreadable multipart form");
    Rejection::BadRequest
}
