//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Settings → logging → configuration store (fatal) → watcher
//!     → metrics → listener → serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop accepting → drain requests → stop watcher
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: an invalid configuration stops the process before
//!   the listener is bound
//! - The watcher thread is joined last, after the server has drained

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, StartupError};
