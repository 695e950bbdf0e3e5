//! HTTP source configuration.

use std::time::Duration;
use url::Url;

/// Configuration for the HTTP schedule source.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the booking API.
    pub base_url: Url,

    /// Bearer token for the authenticated session.
    pub token: Option<String>,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl HttpConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(base_url.as_ref())?;
        Ok(Self {
            base_url: parsed,
            token: None,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("daybook/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Joins a path onto the base URL, keeping any path prefix of the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Returns true if a token is configured.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_creation() {
        let config = HttpConfig::new("https://api.example.com/v1").unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.com/v1");
        assert!(!config.has_token());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("daybook/"));
    }

    #[test]
    fn config_builder() {
        let config = HttpConfig::new("https://api.example.com")
            .unwrap()
            .with_token("secret")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test/1.0");

        assert!(config.has_token());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test/1.0");
    }

    #[test]
    fn empty_token_is_not_a_token() {
        let config = HttpConfig::new("https://api.example.com").unwrap().with_token("");
        assert!(!config.has_token());
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let config = HttpConfig::new("https://api.example.com/v1/").unwrap();
        assert_eq!(
            config.endpoint("/appointments/me"),
            "https://api.example.com/v1/appointments/me"
        );

        let config = HttpConfig::new("https://api.example.com").unwrap();
        assert_eq!(
            config.endpoint("providers/p-1/month-availability"),
            "https://api.example.com/providers/p-1/month-availability"
        );
    }

    #[test]
    fn invalid_url() {
        assert!(HttpConfig::new("not a url").is_err());
    }
}
