//! Configuration errors and JSON loading helpers.

use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading brushes, shapes or board descriptions.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Invalid square: {0}")]
    InvalidSquare(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Parse any serde type from a JSON string.
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> ConfigResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a JSON file.
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> ConfigResult<T> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    log::debug!("Loaded {} bytes from {}", text.len(), path.display());
    from_json_str(&text)
}
