//! Classification helpers used by the orchestrator.
//!
//! - content.rs decides whether an uploaded document is binary or text
//! - error.rs maps capability failures onto a terminal outcome

pub mod content;
pub mod error;

pub use content::is_binary;
pub use error::classify;
