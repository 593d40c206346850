//! Failures reported by the signing engine.

use std::error::Error as StdError;

use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// The three failure kinds an engine call can end with.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The submitted content or parameters were rejected (bad XML,
    /// unsupported format, unusable certificate).
    #[error("client-side failure: {0}")]
    Client(#[source] BoxError),

    /// Infrastructure failure (engine or CRL distribution point unreachable).
    #[error("server-side failure: {0}")]
    Server(#[source] BoxError),

    /// I/O or any other processing failure.
    #[error("processing failure: {0}")]
    Processing(#[source] BoxError),
}

impl CapabilityError {
    pub fn client(err: impl Into<BoxError>) -> Self {
        Self::Client(err.into())
    }

    pub fn server(err: impl Into<BoxError>) -> Self {
        Self::Server(err.into())
    }

    pub fn processing(err: impl Into<BoxError>) -> Self {
        Self::Processing(err.into())
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            CapabilityError::Client(_) => "client",
            CapabilityError::Server(_) => "server",
            CapabilityError::Processing(_) => "processing",
        }
    }
}

impl From<std::io::Error> for CapabilityError {
    fn from(e: std::io::Error) -> Self {
        Self::Processing(Box::new(e))
    }
}

/// Render the error and its whole source chain, outermost first.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": caused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
