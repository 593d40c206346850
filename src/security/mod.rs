//! Security subsystem.
//!
//! Per-configuration secrets protecting the signing workflows (secrets.rs).
//! Secrets are stored hashed; plain values only exist in requests.

pub mod secrets;
