//! Failures of the booking API and the other schedule sources.
//!
//! A source reports every failure as a [`ProviderError`]. The stores keep
//! their previous data whatever the code is; the code decides how the
//! failure is worded and whether pressing retry can help.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Why a schedule fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The session token is missing or was rejected (401, 403).
    AuthenticationFailed,
    /// No response arrived: connect failure or timeout.
    NetworkError,
    /// The API asked the client to slow down (429).
    RateLimited,
    /// A 5xx or otherwise unexpected status.
    ServerError,
    /// The body is not the JSON the endpoint documents.
    InvalidResponse,
    /// Unknown provider id or endpoint (404).
    NotFound,
    /// The source could not be built from its settings or fixture.
    ConfigurationError,
}

impl ProviderErrorCode {
    /// Whether repeating the same request later may succeed.
    ///
    /// Token, configuration and payload problems need the user to act first.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::NetworkError | Self::RateLimited | Self::ServerError)
    }

    /// Snake-case name used in logs and notices.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed call to a [`ScheduleSource`](crate::ScheduleSource).
///
/// Displays as `[source] code: message`, the form shown in stale notices.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    source_name: Option<String>,
    #[source]
    cause: Option<Box<dyn StdError + Send + Sync>>,
}

impl ProviderError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_name: None,
            cause: None,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RateLimited, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Tags the error with the [`ScheduleSource::name`](crate::ScheduleSource::name)
    /// that produced it.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Attaches the transport or decoding error underneath.
    pub fn with_source<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// See [`ProviderErrorCode::is_retryable`].
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_name {
            Some(name) => write!(f, "[{}] {}: {}", name, self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// Result of a source call.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_are_retryable() {
        assert!(ProviderError::network("timed out").is_retryable());
        assert!(ProviderError::rate_limited("retry after 5s").is_retryable());
        assert!(ProviderError::server("502").is_retryable());
    }

    #[test]
    fn user_fixable_failures_are_not_retryable() {
        assert!(!ProviderError::authentication("token expired").is_retryable());
        assert!(!ProviderError::not_found("no provider p-9").is_retryable());
        assert!(!ProviderError::invalid_response("expected array").is_retryable());
        assert!(!ProviderError::configuration("bad fixture").is_retryable());
    }

    #[test]
    fn display_with_and_without_source_name() {
        let err = ProviderError::network("connection refused").with_source_name("http");
        assert_eq!(err.to_string(), "[http] network_error: connection refused");
        assert_eq!(err.source_name(), Some("http"));
        assert_eq!(
            ProviderError::not_found("no such provider").to_string(),
            "not_found: no such provider"
        );
    }

    #[test]
    fn keeps_decoding_cause() {
        let parse_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ProviderError::invalid_response("bad body").with_source(parse_err);
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert_eq!(err.message(), "bad body");
        assert!(StdError::source(&err).is_some());
    }
}
