// Error types for the REST helper. Transport, status and decode failures
// are kept apart so a calling test can tell which layer broke.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { status: StatusCode, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{0}` in response item")]
    MissingField(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl RestError {
    /// Status code carried by an HTTP status error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RestError::Status { status, .. } => Some(*status),
            RestError::Transport(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RestError>;
