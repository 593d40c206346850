//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ConfigDocument;
use crate::config::store::ConfigSnapshot;
use crate::config::validation::{validate_document, EntryProblem};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_problems(.0))]
    Invalid(Vec<EntryProblem>),
}

fn join_problems(problems: &[EntryProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, parse and validate a configuration document.
///
/// Either every entry validates and a snapshot is returned, or the whole
/// document is rejected.
pub fn load_config(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate a configuration document held in memory.
pub fn parse_config(content: &str) -> Result<ConfigSnapshot, ConfigError> {
    let document: ConfigDocument = serde_json::from_str(content)?;

    if let Err(problems) = validate_document(&document) {
        for problem in &problems {
            tracing::error!(%problem, "Invalid configuration entry");
        }
        return Err(ConfigError::Invalid(problems));
    }

    Ok(ConfigSnapshot::new(document))
}
