//! Tracing setup and structured task logging.
//!
//! Logs go to stderr; stdout is reserved for the rendered screens.

use std::time::Duration;

use tracing::{debug, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vclip_models::TaskStatus;

/// Initialize tracing with colored output for dev, JSON when `LOG_FORMAT=json`.
pub fn init_tracing(verbose: bool) {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    // Quiet by default so log lines do not interleave with the screens.
    let level = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "vclip={level},vclip_frontend={level},vclip_client={level}"
        ))
    });

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Structured log events for one task's status polling.
///
/// Events carry the poll sequence number and task state as fields; the task
/// id lives on the span from [`TaskLogger::span`], so events must be emitted
/// inside it.
#[derive(Debug, Clone)]
pub struct TaskLogger {
    task_id: String,
    operation: &'static str,
}

impl TaskLogger {
    pub fn new(task_id: &str, operation: &'static str) -> Self {
        Self {
            task_id: task_id.to_string(),
            operation,
        }
    }

    pub fn span(&self) -> Span {
        tracing::info_span!("task", task_id = %self.task_id, operation = self.operation)
    }

    pub fn started(&self, period: Duration) {
        info!(period_ms = period.as_millis() as u64, "Polling started");
    }

    pub fn progress(&self, seq: u64, status: TaskStatus, progress: Option<f64>) {
        debug!(seq, status = %status, progress = ?progress, "Task progress");
    }

    pub fn completed(&self, seq: u64, clips: usize) {
        info!(seq, clips, "Task completed");
    }

    /// Backend failure or a failed status request. Logged once, at warn.
    pub fn failed(&self, seq: u64, reason: &str) {
        warn!(seq, reason, "Task failed");
    }

    pub fn stopped(&self, reason: &'static str) {
        debug!(reason, "Polling stopped");
    }
}
