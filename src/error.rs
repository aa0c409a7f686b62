//! Error types for the wrap preview configurator.

use std::time::Duration;
use thiserror::Error;

/// Failures of an external collaborator (catalog, registration resolver, generation backend)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Rejected manual edits of the selection
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No make selected")]
    MakeNotSelected,

    #[error("Model '{model}' is not offered for make '{make}'")]
    UnknownModel { make: String, model: String },

    #[error("Unknown wrap: {0}")]
    UnknownWrap(String),
}

/// Image intake rejections
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Not an image (content type: {content_type:?})")]
    NotAnImage { content_type: String },
}

/// Top-level errors surfaced by the library and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Image rejected: {0}")]
    Intake(#[from] IntakeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}
