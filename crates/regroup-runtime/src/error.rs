#![forbid(unsafe_code)]

//! Error types for the runtime layer.

use thiserror::Error;

/// Failure of the `rearrange_sections` mutation.
///
/// Never fatal: the board rolls back to the last confirmed order and raises
/// a warning notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    /// The backend refused the order (validation, permissions, conflict).
    #[error("server rejected section order: {0}")]
    Rejected(String),

    /// The request never got a definitive answer.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,
}

/// Errors that can occur when loading or validating a [`BoardConfig`].
///
/// [`BoardConfig`]: crate::config::BoardConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
