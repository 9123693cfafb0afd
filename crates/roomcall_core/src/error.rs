//! Error types for the core module.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while resolving configuration or rooms.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid room URL: {0}")]
    InvalidRoomUrl(String),

    #[error("No room URL supplied")]
    MissingRoomUrl,

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    #[error("Invalid room domain pattern: {0}")]
    Pattern(#[from] regex::Error),
}
