//! Route handlers.
//!
//! Handlers only decode the request and hand it to the orchestrator on the
//! blocking pool; every decision about the outcome is made there.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::request::{self, read_workflow_request};
use crate::http::response::respond;
use crate::http::server::AppState;
use crate::orchestrator::{Orchestrator, Rejection, Workflow};
use crate::security::secrets::{self, SecretError};

/// Run `f` against the orchestrator on the blocking pool.
async fn blocking<T, F>(orchestrator: &Arc<Orchestrator>, f: F) -> Result<T, Rejection>
where
    T: Send + 'static,
    F: FnOnce(&Orchestrator) -> Result<T, Rejection> + Send + 'static,
{
    let orchestrator = orchestrator.clone();
    tokio::task::spawn_blocking(move || f(&orchestrator))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Workflow task failed");
            Err(Rejection::InternalServerError)
        })
}

pub async fn workflow(
    workflow: Workflow,
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Multipart, MultipartRejection>,
) -> Response {
    let start = Instant::now();
    tracing::debug!(
        request_id = request::request_id(&headers),
        workflow = workflow.name(),
        "Workflow request received"
    );

    let result = match form {
        Ok(form) => match read_workflow_request(&headers, form).await {
            Ok(req) => blocking(&state.orchestrator, move |o| o.run(workflow, &req)).await,
            Err(rejection) => Err(rejection),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Request is not a multipart form");
            Err(Rejection::BadRequest)
        }
    };

    respond(workflow.name(), result, start)
}

pub async fn ca_list(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let result = blocking(&state.orchestrator, move |o| o.ca_list(accept.as_deref())).await;
    respond("ca", result, start)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainSecret {
    #[serde(default)]
    pub plain_secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashedSecret {
    pub secure_secret_hash: String,
}

pub async fn hash_secret(body: Result<Json<PlainSecret>, JsonRejection>) -> Response {
    let start = Instant::now();
    let result = match body {
        Ok(Json(PlainSecret { plain_secret })) => {
            tokio::task::spawn_blocking(move || secrets::hash_secret(&plain_secret))
                .await
                .unwrap_or_else(|e| Err(SecretError::Hash(e.to_string())))
                .map(|secure_secret_hash| HashedSecret { secure_secret_hash })
                .map_err(|e| match e {
                    SecretError::Empty => Rejection::BadRequest,
                    SecretError::Hash(reason) => {
                        tracing::error!(error = %reason, "Could not hash secret");
                        Rejection::InternalServerError
                    }
                })
        }
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable secret body");
            Err(Rejection::BadRequest)
        }
    };
    respond("hash_secret", result, start)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayStatus {
    pub version: String,
    pub signature: usize,
    pub proof: usize,
    pub signature_verification: usize,
    pub certificate_verification: usize,
    pub ca: usize,
}

pub async fn status(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let snapshot = state.orchestrator.store().current();
    let document = snapshot.document();
    let body = GatewayStatus {
        version: state.orchestrator.version().to_string(),
        signature: document.signature.len(),
        proof: document.proof.len(),
        signature_verification: document.signature_verification.len(),
        certificate_verification: document.certificate_verification.len(),
        ca: document.ca.len(),
    };
    respond("status", Ok::<_, Rejection>(body), start)
}
