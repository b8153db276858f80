//! Error types for the list client.
//!
//! # Design
//! HTTP statuses are never errors here. A 304, 404 or 412 is a response the
//! caller routes on; only failures that leave no response to hand back, or
//! requests that cannot be built at all, become an `ApiError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was obtained: DNS, connect, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Update and delete must name a version; pass `*` to skip the check.
    #[error("an entity tag is required for this operation (use \"*\" to match any version)")]
    MissingEntityTag,

    /// The target is not an absolute URL; nothing was sent.
    #[error("invalid request uri {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// The value cannot be carried in an HTTP header.
    #[error("invalid value for header {name}")]
    InvalidHeader { name: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
