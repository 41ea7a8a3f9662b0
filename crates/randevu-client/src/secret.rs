//! Secret references in `config.toml`.
//!
//! A value can point at a secret kept outside the file:
//!
//! - `pass::path/in/store` runs `pass show path/in/store` and keeps the first line
//! - `env::VAR_NAME` reads `$VAR_NAME`
//! - anything else is used verbatim

use std::process::Command;

use thiserror::Error;

/// A secret reference that could not be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("failed to run `pass show {path}`: {message}")]
    PassSpawn { path: String, message: String },

    #[error("`pass show {path}` failed ({status}): {stderr}")]
    PassFailed {
        path: String,
        status: String,
        stderr: String,
    },

    #[error("`pass show {path}` produced no output")]
    PassEmpty { path: String },

    #[error("environment variable `{0}` is not set")]
    MissingEnv(String),

    #[error("secret reference resolved to an empty value")]
    Empty,
}

/// Resolves a value that may be a secret reference.
pub fn resolve(value: &str) -> Result<String, SecretError> {
    let resolved = if let Some(path) = value.strip_prefix("pass::") {
        from_pass(path)?
    } else if let Some(var) = value.strip_prefix("env::") {
        std::env::var(var).map_err(|_| SecretError::MissingEnv(var.to_string()))?
    } else {
        return Ok(value.to_string());
    };

    let resolved = resolved.trim().to_string();
    if resolved.is_empty() {
        return Err(SecretError::Empty);
    }
    Ok(resolved)
}

/// Returns true if `value` is a reference rather than an inline secret.
pub fn is_reference(value: &str) -> bool {
    value.starts_with("pass::") || value.starts_with("env::")
}

fn from_pass(path: &str) -> Result<String, SecretError> {
    let output = Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| SecretError::PassSpawn {
            path: path.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(SecretError::PassFailed {
            path: path.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| SecretError::PassEmpty {
            path: path.to_string(),
        })
}
