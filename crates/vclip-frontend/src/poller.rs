//! Task status poller.
//!
//! One poller task per task id. Polls are sequential: the next request is
//! issued only after the previous response arrived, so there is never more
//! than one request in flight. Updates carry a sequence number so the app
//! can drop anything out of date.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::Instrument;

use vclip_client::ClipClient;
use vclip_models::{GeneratedClip, TaskSnapshot, TaskStatus};

use crate::logging::TaskLogger;

const UPDATE_BUFFER: usize = 16;
const DEFAULT_FAILURE_MESSAGE: &str = "Processing failed";

/// What one poll found.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Task still running
    Progress(TaskSnapshot),
    /// Task finished with these clips
    Completed(Vec<GeneratedClip>),
    /// Task failed, or the status request itself failed
    Failed(String),
}

impl PollOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollOutcome::Progress(_))
    }

    fn from_snapshot(snapshot: TaskSnapshot) -> Self {
        match snapshot.status {
            TaskStatus::Completed => PollOutcome::Completed(snapshot.clips.unwrap_or_default()),
            TaskStatus::Failed => PollOutcome::Failed(
                snapshot
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ),
            _ => PollOutcome::Progress(snapshot),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate {
    pub task_id: String,
    /// Starts at 1 and increases by one per poll
    pub seq: u64,
    pub outcome: PollOutcome,
}

/// Owned handle to a running poller.
///
/// Dropping the handle closes both channels, which stops the poller.
#[derive(Debug)]
pub struct PollHandle {
    task_id: String,
    updates: mpsc::Receiver<PollUpdate>,
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Next update; `None` once the poller stopped.
    pub async fn recv(&mut self) -> Option<PollUpdate> {
        self.updates.recv().await
    }

    /// Stop polling. A request in flight is abandoned.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Cancel and wait for the poller task to exit.
    pub async fn shutdown(self) {
        self.cancel();
        let _ = self.task.await;
    }
}

/// Spawns status pollers.
#[derive(Debug, Clone)]
pub struct StatusPoller {
    client: ClipClient,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(client: ClipClient, interval: Duration) -> Self {
        Self { client, interval }
    }

    /// Start polling a task. The first poll fires one interval from now.
    pub fn spawn(&self, task_id: impl Into<String>) -> PollHandle {
        let task_id = task_id.into();
        let (tx, rx) = mpsc::channel(UPDATE_BUFFER);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let logger = TaskLogger::new(&task_id, "status_poll");
        let span = logger.span();
        let task = tokio::spawn(
            run_poll_loop(self.client.clone(), task_id.clone(), self.interval, tx, cancel_rx, logger)
                .instrument(span),
        );

        PollHandle {
            task_id,
            updates: rx,
            cancel: cancel_tx,
            task,
        }
    }
}

async fn run_poll_loop(
    client: ClipClient,
    task_id: String,
    period: Duration,
    updates: mpsc::Sender<PollUpdate>,
    mut cancel: watch::Receiver<bool>,
    logger: TaskLogger,
) {
    logger.started(period);

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq = 0u64;

    loop {
        tokio::select! {
            _ = cancel.changed() => {
                logger.stopped("cancelled");
                return;
            }
            _ = updates.closed() => {
                logger.stopped("receiver dropped");
                return;
            }
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.changed() => {
                logger.stopped("cancelled with a request in flight");
                return;
            }
            result = client.poll_status(&task_id) => result,
        };

        seq += 1;
        let outcome = match result {
            Ok(snapshot) => PollOutcome::from_snapshot(snapshot),
            Err(e) => PollOutcome::Failed(e.to_string()),
        };

        match &outcome {
            PollOutcome::Progress(snapshot) => {
                logger.progress(seq, snapshot.status, snapshot.progress)
            }
            PollOutcome::Completed(clips) => logger.completed(seq, clips.len()),
            PollOutcome::Failed(reason) => logger.failed(seq, reason),
        }

        let terminal = outcome.is_terminal();
        let update = PollUpdate {
            task_id: task_id.clone(),
            seq,
            outcome,
        };
        if updates.send(update).await.is_err() {
            return;
        }
        if terminal {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vclip_client::ClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FAST: Duration = Duration::from_millis(20);

    async fn poller_for(server: &MockServer) -> StatusPoller {
        let client = ClipClient::new(ClientConfig::default().with_base_url(server.uri())).unwrap();
        StatusPoller::new(client, FAST)
    }

    #[test]
    fn test_outcome_from_snapshot() {
        let failed = TaskSnapshot {
            task_id: "t1".into(),
            status: TaskStatus::Failed,
            progress: None,
            current_step: None,
            clips: None,
            error: None,
        };
        assert_eq!(
            PollOutcome::from_snapshot(failed),
            PollOutcome::Failed(DEFAULT_FAILURE_MESSAGE.into())
        );

        let completed = TaskSnapshot {
            task_id: "t1".into(),
            status: TaskStatus::Completed,
            progress: Some(100.0),
            current_step: None,
            clips: None,
            error: None,
        };
        assert_eq!(PollOutcome::from_snapshot(completed), PollOutcome::Completed(vec![]));
    }

    #[tokio::test]
    async fn test_polls_until_completed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "transcribing", "progress": 40
            })))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1",
                "status": "completed",
                "progress": 100,
                "clips": [{
                    "id": "c1", "title": "Peak", "duration": "0:28",
                    "viralScore": 94, "startTime": 754, "endTime": 782
                }]
            })))
            .mount(&server)
            .await;

        let mut handle = poller_for(&server).await.spawn("t1");

        let mut updates = Vec::new();
        while let Some(update) = handle.recv().await {
            updates.push(update);
        }

        assert_eq!(updates.len(), 3);
        assert_eq!(updates.iter().map(|u| u.seq).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(matches!(updates[0].outcome, PollOutcome::Progress(_)));
        match &updates[2].outcome {
            PollOutcome::Completed(clips) => assert_eq!(clips[0].id, "c1"),
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_backend_failure_stops_polling() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "failed", "progress": 0, "error": "video unavailable"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut handle = poller_for(&server).await.spawn("t1");

        let update = handle.recv().await.unwrap();
        assert_eq!(update.outcome, PollOutcome::Failed("video unavailable".into()));
        assert!(handle.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_http_error_is_reported_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let mut handle = poller_for(&server).await.spawn("t1");

        let update = handle.recv().await.unwrap();
        assert_eq!(
            update.outcome,
            PollOutcome::Failed("Failed to get task status: Internal Server Error".into())
        );
        assert!(handle.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_stops_polling() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "rendering", "progress": 10
            })))
            .mount(&server)
            .await;

        let mut handle = poller_for(&server).await.spawn("t1");
        assert!(handle.recv().await.is_some());

        handle.cancel();
        // The channel closes once the poller exits; drain anything sent
        // before the cancel landed.
        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            let mut count = 0;
            while handle.recv().await.is_some() {
                count += 1;
            }
            count
        })
        .await
        .expect("poller did not stop after cancel");
        assert!(drained <= 1);
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_poller() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "downloading"
            })))
            .mount(&server)
            .await;

        let handle = poller_for(&server).await.spawn("t1");
        drop(handle);

        tokio::time::sleep(FAST * 5).await;
        let requests = server.received_requests().await.unwrap();
        assert!(requests.len() <= 1, "poller kept running: {} requests", requests.len());
    }
}
