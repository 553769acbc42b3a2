//! Client error types.

use reqwest::StatusCode;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx response. Only the status text is kept, bodies are not parsed.
    #[error("Failed to {operation}: {reason}")]
    Status {
        operation: &'static str,
        status: StatusCode,
        reason: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn from_status(operation: &'static str, status: StatusCode) -> Self {
        let reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
        Self::Status {
            operation,
            status,
            reason,
        }
    }
}
