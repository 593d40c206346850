//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with one route per workflow
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind the server to a listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{HeaderMap, Request};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::settings::ListenerConfig;
use crate::http::handlers;
use crate::http::request::{self, UuidRequestId};
use crate::orchestrator::{Orchestrator, Workflow};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(listener: &ListenerConfig, orchestrator: Arc<Orchestrator>) -> Self {
        let state = AppState { orchestrator };
        Self {
            router: Self::build_router(listener, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/ca", get(handlers::ca_list))
            .route("/secrets/hash", post(handlers::hash_secret))
            .route("/status", get(handlers::status));

        for workflow in Workflow::ALL {
            router = router.route(
                workflow.path(),
                post(
                    move |state: State<AppState>,
                          headers: HeaderMap,
                          form: Result<Multipart, axum::extract::multipart::MultipartRejection>| {
                        handlers::workflow(workflow, state, headers, form)
                    },
                ),
            );
        }

        router
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %req.method(),
                            path = %req.uri().path(),
                            request_id = request::request_id(req.headers()),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for serving it on a custom listener.
    pub fn into_router(self) -> Router {
        self.router
    }
}
