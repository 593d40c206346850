//! Configuration secrets.
//!
//! A signing configuration may carry one or more Argon2id hashes (PHC
//! strings, whitespace separated). A caller secret matches when it verifies
//! against any of them.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret must not be empty")]
    Empty,

    #[error("invalid secret hash: {0}")]
    Hash(String),
}

/// Hash a plain secret with Argon2id and a fresh salt.
pub fn hash_secret(plain: &str) -> Result<String, SecretError> {
    if plain.is_empty() {
        return Err(SecretError::Empty);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SecretError::Hash(e.to_string()))
}

/// Parse a stored hash without verifying anything.
pub fn parse_hash(hash: &str) -> Result<PasswordHash<'_>, SecretError> {
    PasswordHash::new(hash).map_err(|e| SecretError::Hash(e.to_string()))
}

/// Returns true when the configured secret is set and the candidate matches
/// none of its hashes.
///
/// An absent or blank configured secret never rejects.
pub fn no_secret_match(configured: Option<&str>, candidate: Option<&str>) -> bool {
    let configured = match configured {
        Some(c) if !c.trim().is_empty() => c,
        _ => return false,
    };
    let candidate = match candidate {
        Some(c) => c,
        None => return true,
    };

    !configured.split_whitespace().any(|hash| match parse_hash(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping unusable configured secret hash");
            false
        }
    })
}
