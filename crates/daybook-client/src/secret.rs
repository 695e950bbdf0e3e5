//! Secret reference resolver.
//!
//! Values in `config.toml` can use special prefixes to reference secrets
//! stored outside the file:
//!
//! - `pass::path/in/store` — runs `pass show path/in/store`, returns first line
//! - `env::VAR_NAME` — reads `$VAR_NAME` from the environment
//! - anything else — returned as-is (plain text)

use crate::error::{ClientError, ClientResult};

/// Resolves a value that may contain a secret reference prefix.
pub fn resolve(value: &str) -> ClientResult<String> {
    if let Some(path) = value.strip_prefix("pass::") {
        resolve_pass(path)
    } else if let Some(var) = value.strip_prefix("env::") {
        resolve_env(var)
    } else {
        Ok(value.to_string())
    }
}

/// Runs `pass show <path>` and returns the first line of stdout.
fn resolve_pass(path: &str) -> ClientResult<String> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| ClientError::Secret(format!("failed to run `pass show {}`: {}", path, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClientError::Secret(format!(
            "`pass show {}` failed (exit {}): {}",
            path,
            output.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .next()
        .map(|s| s.to_string())
        .ok_or_else(|| ClientError::Secret(format!("`pass show {}` produced no output", path)))
}

fn resolve_env(var: &str) -> ClientResult<String> {
    std::env::var(var)
        .map_err(|_| ClientError::Secret(format!("environment variable `{}` is not set", var)))
}
