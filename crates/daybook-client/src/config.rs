//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/daybook/config.toml` by default.
//!
//! The session `token` supports secret references:
//! - `pass::path/in/store` — resolved via `pass show`
//! - `env::VAR_NAME` — resolved from the environment
//! - plain text — used as-is

use std::path::{Path, PathBuf};

use daybook_core::FormatOptions;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Configuration for the daybook client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Identity of the signed-in provider.
    pub session: SessionSettings,

    /// Booking API settings.
    pub api: ApiSettings,

    /// Labels used when rendering.
    pub display: FormatOptions,
}

/// Session settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Provider whose calendar is viewed.
    pub provider_id: Option<String>,

    /// Bearer token (supports `pass::` and `env::` prefixes).
    pub token: Option<String>,
}

impl SessionSettings {
    /// Resolves the token, expanding secret references.
    pub fn resolve_token(&self) -> ClientResult<Option<String>> {
        self.token
            .as_deref()
            .map(crate::secret::resolve)
            .transpose()
    }
}

/// Booking API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the booking API.
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: 30,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if it does not
    /// exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daybook")
    }
}
