//! Error types for Tenet

use thiserror::Error;

/// The main error type for Tenet operations outside evaluation itself
#[derive(Debug, Error)]
pub enum TenetError {
    #[error("Unknown type name: {0}")]
    UnknownType(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),
}

/// Result type alias for Tenet operations
pub type Result<T> = std::result::Result<T, TenetError>;

impl From<toml::de::Error> for TenetError {
    fn from(err: toml::de::Error) -> Self {
        TenetError::TomlParseError(err.to_string())
    }
}

impl From<serde_json::Error> for TenetError {
    fn from(err: serde_json::Error) -> Self {
        TenetError::JsonParseError(err.to_string())
    }
}
