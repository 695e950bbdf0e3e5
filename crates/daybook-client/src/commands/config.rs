//! Configuration commands.

use std::path::Path;

use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    check(config)?;
    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

/// Checks the settings the default command depends on.
pub(crate) fn check(config: &ClientConfig) -> ClientResult<()> {
    if let Some(ref provider_id) = config.session.provider_id {
        if provider_id.trim().is_empty() {
            return Err(ClientError::Config("session.provider_id must not be empty".into()));
        }
    }

    if let Some(ref base_url) = config.api.base_url {
        let url = Url::parse(base_url).map_err(|e| {
            ClientError::Config(format!("api.base_url `{}` is not a valid URL: {}", base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ClientError::Config(format!(
                "api.base_url must be an http(s) URL with a host, got `{}`",
                base_url
            )));
        }
    }

    if config.api.timeout == 0 {
        return Err(ClientError::Config("api.timeout must be at least 1 second".into()));
    }

    config
        .session
        .resolve_token()
        .map_err(|e| ClientError::Config(format!("invalid session token: {}", e)))?;

    Ok(())
}
