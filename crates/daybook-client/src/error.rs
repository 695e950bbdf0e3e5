//! Client error types.

use daybook_core::TracingError;
use daybook_providers::ProviderError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
///
/// Fetch failures are not listed here: the view keeps running on stale data
/// and reports them as notices.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
    /// A secret reference could not be resolved.
    #[error("secret error: {0}")]
    Secret(String),
    /// Invalid command-line argument.
    #[error("invalid argument: {0}")]
    Argument(String),
    /// Source setup error.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    /// Output serialization error.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
    /// Tracing setup error.
    #[error(transparent)]
    Tracing(#[from] TracingError),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
