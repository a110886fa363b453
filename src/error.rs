//! Error types for email-draft.
//!
//! The draft pipeline itself is total and has no error type. Everything here
//! belongs to the surrounding layers: configuration, request loading and the
//! generation collaborator.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while loading or validating a draft request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Required free-text input is absent. Checked before the pipeline runs.
    #[error("Missing required input: {field}")]
    MissingInput { field: String },

    #[error("Failed to parse request: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generation collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The collaborator returned text that is not the expected `{subject, body}` shape.
///
/// Only produced inside the decoder, which always recovers from it.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Response is not a draft object: {0}")]
    NotDraftJson(#[from] serde_json::Error),

    #[error("No brace-delimited object found in response")]
    NoObject,
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
