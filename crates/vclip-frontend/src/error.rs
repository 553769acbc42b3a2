//! Frontend error types.

use thiserror::Error;

pub type FrontendResult<T> = Result<T, FrontendError>;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("Please paste a video URL")]
    EmptyUrl,

    #[error("Invalid video URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("No clip #{0} in the gallery")]
    UnknownClip(usize),

    /// Backend reported failure, or status polling failed
    #[error("Processing failed: {0}")]
    TaskFailed(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("{0}")]
    Client(#[from] vclip_client::ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrontendError {
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl(url.into(), reason.to_string())
    }

    /// Whether a session flow already showed this error as a notification.
    /// Only output failures are left for the caller to report.
    pub fn is_notified(&self) -> bool {
        !matches!(self, FrontendError::Io(_))
    }
}
