//! Fetch outcomes as seen by the stores.

use daybook_providers::{ProviderError, ProviderErrorCode};
use thiserror::Error;

/// A failed fetch, caught at the store boundary.
///
/// Unlike [`ProviderError`] this is `Clone` and carries no boxed cause, so it
/// can be kept in store state and handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchFailure {
    /// Error category reported by the source.
    pub code: ProviderErrorCode,
    /// Human readable description.
    pub message: String,
    /// Whether retrying without user action may succeed.
    pub retryable: bool,
}

impl From<&ProviderError> for FetchFailure {
    fn from(err: &ProviderError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

impl From<ProviderError> for FetchFailure {
    fn from(err: ProviderError) -> Self {
        Self::from(&err)
    }
}

/// What happened to a fetch request or its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The key was already loaded or requested; nothing was fetched.
    Cached,
    /// The result replaced the held data.
    Applied,
    /// The fetch failed; the held data was kept and marked stale.
    Failed(FetchFailure),
    /// A newer request superseded this one; the result was dropped.
    Discarded,
}

impl FetchOutcome {
    /// Returns true if the store's data or status changed.
    pub fn changed_state(&self) -> bool {
        matches!(self, Self::Applied | Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_from_provider_error() {
        let err = ProviderError::network("connection refused").with_source_name("http");
        let failure = FetchFailure::from(&err);
        assert_eq!(failure.code, ProviderErrorCode::NetworkError);
        assert_eq!(failure.to_string(), "[http] network_error: connection refused");
        assert!(failure.retryable);
    }

    #[test]
    fn rejected_token_is_not_retryable() {
        let failure = FetchFailure::from(ProviderError::authentication("token expired"));
        assert_eq!(failure.code, ProviderErrorCode::AuthenticationFailed);
        assert!(!failure.retryable);
    }

    #[test]
    fn outcome_changed_state() {
        assert!(FetchOutcome::Applied.changed_state());
        assert!(FetchOutcome::Failed(ProviderError::server("boom").into()).changed_state());
        assert!(!FetchOutcome::Cached.changed_state());
        assert!(!FetchOutcome::Discarded.changed_state());
    }
}
