//! Signing gateway library.
//!
//! Gates an external signing, validation and proof engine behind an HTTP
//! API, with a hot-reloadable configuration store and fixed multi-step
//! workflows.

pub mod capabilities;
pub mod classify;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orchestrator;
pub mod security;

pub use config::{ConfigStore, GatewaySettings};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use orchestrator::Orchestrator;
