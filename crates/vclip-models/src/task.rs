//! Clip generation task models.
//!
//! A task is created by the backend when a URL is submitted and only ever
//! read back by the client through status polling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clip::GeneratedClip;

/// Caption style requested when none is given.
pub const DEFAULT_STYLE: &str = "mrbeast";

/// Task lifecycle status, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is queued on the backend
    #[default]
    Pending,
    /// Source video is being downloaded
    Downloading,
    /// Audio is being transcribed
    Transcribing,
    /// Viral moments are being detected
    Analyzing,
    /// Clips are being rendered
    Rendering,
    /// Task finished, clips are available
    Completed,
    /// Task failed with an error
    Failed,
}

impl TaskStatus {
    pub const ALL: &'static [TaskStatus] = &[
        TaskStatus::Pending,
        TaskStatus::Downloading,
        TaskStatus::Transcribing,
        TaskStatus::Analyzing,
        TaskStatus::Rendering,
        TaskStatus::Completed,
        TaskStatus::Failed,
    ];

    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Downloading => "downloading",
            TaskStatus::Transcribing => "transcribing",
            TaskStatus::Analyzing => "analyzing",
            TaskStatus::Rendering => "rendering",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Index of the processing step this status belongs to (0..=3).
    ///
    /// `Completed` lands on the last step; callers treat it as all steps done.
    pub fn step_index(&self) -> usize {
        match self {
            TaskStatus::Pending | TaskStatus::Downloading => 0,
            TaskStatus::Transcribing => 1,
            TaskStatus::Analyzing => 2,
            TaskStatus::Rendering | TaskStatus::Completed => 3,
            TaskStatus::Failed => 0,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TaskStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| StatusParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown task status: {0}")]
pub struct StatusParseError(String);

/// Body of `POST /generate-clips`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateClipsRequest {
    /// Source video URL
    pub url: String,
    /// Caption style
    pub style: String,
}

impl GenerateClipsRequest {
    pub fn new(url: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            style: style.into(),
        }
    }

    /// Request with the default caption style.
    pub fn with_default_style(url: impl Into<String>) -> Self {
        Self::new(url, DEFAULT_STYLE)
    }
}

/// Response of `POST /generate-clips`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateClipsResponse {
    pub task_id: String,
    pub status: String,
}

impl GenerateClipsResponse {
    /// Status the task starts in; unknown strings count as pending.
    pub fn initial_status(&self) -> TaskStatus {
        self.status.parse().unwrap_or_default()
    }
}

/// Snapshot returned by `GET /status/{task_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub task_id: String,
    pub status: TaskStatus,
    /// Progress percentage reported by the backend, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Human readable label of the step the backend is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    /// Generated clips, present once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clips: Option<Vec<GeneratedClip>>,
    /// Error message, present once failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskSnapshot {
    /// Check if the task is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
