//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! configuration document (JSON)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (every entry self-checks; all-or-nothing)
//!     → ConfigSnapshot (validated, immutable, id-indexed)
//!     → store.rs publishes it via ArcSwap
//!
//! On file change:
//!     watcher.rs sees a modify event for the tracked file
//!     → store.reload() → loader.rs → validation.rs
//!     → atomic swap of Arc<ConfigSnapshot>, or keep the old one on failure
//! ```
//!
//! Process settings (listener, secrets, observability) live in settings.rs
//! and are read once at startup.

pub mod loader;
pub mod schema;
pub mod settings;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CaConf, CertVerifConf, CertificateValidationParameters, ConfigDocument, ProofConf,
    SignVerifConf, SignatureConf, SignatureParameters, SignatureValidationParameters,
};
pub use settings::GatewaySettings;
pub use store::{ConfigSnapshot, ConfigStore};
pub use watcher::{ConfigWatcher, WatcherHandle};
