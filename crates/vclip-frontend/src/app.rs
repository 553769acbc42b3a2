//! Application state machine: input form, processing, gallery.
//!
//! One task is tracked at a time. All mutation happens on the session task;
//! the poller only sends [`PollUpdate`]s in.

use tracing::debug;
use url::Url;

use vclip_models::{GenerateClipsResponse, GeneratedClip, Platform};

use crate::error::{FrontendError, FrontendResult};
use crate::gallery::Gallery;
use crate::notify::{Notification, Notifications};
use crate::poller::{PollOutcome, PollUpdate};
use crate::processing::ProcessingView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Input,
    Processing,
    Gallery,
}

/// Screen change caused by applying an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Still processing, progress changed
    Progressed,
    /// Clips arrived, gallery is showing
    ShowGallery,
    /// Task failed, back at the input form
    BackToInput,
}

/// Validated URL ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub url: String,
    pub platform: Option<Platform>,
}

/// Trim and check a user supplied URL.
pub fn validate_submission(raw: &str) -> FrontendResult<Submission> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(FrontendError::EmptyUrl);
    }

    let parsed = Url::parse(url).map_err(|e| FrontendError::invalid_url(url, e))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(FrontendError::invalid_url(url, "expected an http(s) link"));
    }

    Ok(Submission {
        url: url.to_string(),
        platform: Platform::detect(url),
    })
}

#[derive(Debug, Clone)]
struct ActiveTask {
    task_id: String,
    last_seq: u64,
}

#[derive(Debug, Default)]
pub struct App {
    screen: Screen,
    submitting: bool,
    task: Option<ActiveTask>,
    processing: ProcessingView,
    gallery: Option<Gallery>,
    notifications: Notifications,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task.as_ref().map(|t| t.task_id.as_str())
    }

    pub fn processing(&self) -> &ProcessingView {
        &self.processing
    }

    pub fn processing_mut(&mut self) -> &mut ProcessingView {
        &mut self.processing
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        self.gallery.as_ref()
    }

    pub fn gallery_mut(&mut self) -> Option<&mut Gallery> {
        self.gallery.as_mut()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// Validate the form input and mark the form busy.
    pub fn begin_submit(&mut self, raw: &str) -> FrontendResult<Submission> {
        match validate_submission(raw) {
            Ok(submission) => {
                self.submitting = true;
                Ok(submission)
            }
            Err(e) => {
                self.notify(Notification::error("Invalid URL", e.to_string()));
                Err(e)
            }
        }
    }

    /// Backend accepted the submission: drop the previous task and show
    /// the processing screen.
    pub fn job_started(&mut self, response: &GenerateClipsResponse) {
        self.submitting = false;
        self.gallery = None;
        self.task = Some(ActiveTask {
            task_id: response.task_id.clone(),
            last_seq: 0,
        });
        self.processing = ProcessingView::new();
        self.processing.apply_status(response.initial_status(), None);
        self.screen = Screen::Processing;
    }

    pub fn submit_failed(&mut self, error: &FrontendError) {
        self.submitting = false;
        self.screen = Screen::Input;
        self.notify(Notification::error("Could not start processing", error.to_string()));
    }

    /// Apply one poll update. Stale updates return `None`.
    pub fn apply_update(&mut self, update: PollUpdate) -> Option<Transition> {
        if self.screen != Screen::Processing {
            debug!(task_id = %update.task_id, "Ignoring poll update outside processing");
            return None;
        }

        let task = self.task.as_mut()?;
        if task.task_id != update.task_id || update.seq <= task.last_seq {
            debug!(
                task_id = %update.task_id,
                seq = update.seq,
                "Ignoring stale poll update"
            );
            return None;
        }
        task.last_seq = update.seq;

        match update.outcome {
            PollOutcome::Progress(snapshot) => {
                self.processing.apply_snapshot(&snapshot);
                Some(Transition::Progressed)
            }
            PollOutcome::Completed(clips) => {
                self.show_gallery(clips);
                Some(Transition::ShowGallery)
            }
            PollOutcome::Failed(message) => {
                self.fail(message);
                Some(Transition::BackToInput)
            }
        }
    }

    /// Finish processing with a clip set and switch to the gallery.
    pub fn show_gallery(&mut self, clips: Vec<GeneratedClip>) {
        self.processing.apply_status(vclip_models::TaskStatus::Completed, Some(100.0));
        let count = clips.len();
        self.gallery = Some(Gallery::new(clips));
        self.screen = Screen::Gallery;
        self.notify(Notification::success(
            "Clips ready",
            format!("Found {} viral moments", count),
        ));
    }

    fn fail(&mut self, message: String) {
        self.notify(Notification::error("Processing failed", message));
        self.task = None;
        self.gallery = None;
        self.screen = Screen::Input;
    }

    /// Enter processing without a backend task (demo mode).
    pub fn start_local_processing(&mut self) {
        self.task = None;
        self.gallery = None;
        self.processing = ProcessingView::new();
        self.screen = Screen::Processing;
    }

    /// Back to the input form; task and clips are discarded.
    pub fn reset(&mut self) {
        self.screen = Screen::Input;
        self.submitting = false;
        self.task = None;
        self.gallery = None;
        self.processing = ProcessingView::new();
    }
}
