//! Session flows driven by the CLI.
//!
//! A [`Session`] owns the [`App`] and is the only place it is mutated. The
//! poller feeds it updates over a channel; the gallery and editor read
//! commands line by line from any async reader.

use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use vclip_client::ClipClient;
use vclip_models::{GenerateClipsRequest, TaskSnapshot};

use crate::app::{App, Screen, Transition};
use crate::commands::{EditorCommand, GalleryCommand, EDITOR_HELP, GALLERY_HELP};
use crate::config::FrontendConfig;
use crate::demo::demo_clips;
use crate::error::{FrontendError, FrontendResult};
use crate::gallery::{SortMode, ViewMode};
use crate::notify::Notification;
use crate::poller::{PollOutcome, StatusPoller};
use crate::processing::SimulationTick;
use crate::progress_bars::ProgressDisplay;
use crate::render::{
    render_editor, render_gallery, render_input, render_notification, render_processing,
};

/// How a session talks to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Draw live progress bars instead of plain progress lines
    pub live_progress: bool,
    /// Read gallery commands after clips arrive
    pub interactive: bool,
}

/// Options for one `generate` run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub url: String,
    /// Caption style; the configured default when absent
    pub style: Option<String>,
    pub sort: Option<SortMode>,
    pub view: Option<ViewMode>,
}

/// File a clip download is written to.
pub fn clip_file_path(dir: &Path, clip_id: &str) -> PathBuf {
    let safe: String = clip_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    dir.join(format!("{safe}.mp4"))
}

/// Fetch a clip and write it to `path`. Returns the number of bytes written.
pub async fn download_clip(client: &ClipClient, clip_id: &str, path: &Path) -> FrontendResult<usize> {
    let bytes = client.fetch_clip_binary(clip_id).await?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &bytes).await?;

    info!(clip_id = %clip_id, path = %path.display(), bytes = bytes.len(), "Clip downloaded");
    Ok(bytes.len())
}

/// Forward Ctrl-C presses into a counter channel for [`Session::with_interrupts`].
///
/// The signal handler stays installed for the whole process, so every press
/// after the first is delivered too.
pub fn watch_ctrl_c() -> watch::Receiver<u64> {
    let (tx, rx) = watch::channel(0u64);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            tx.send_modify(|presses| *presses += 1);
        }
    });
    rx
}

pub struct Session<W: Write> {
    config: FrontendConfig,
    client: ClipClient,
    app: App,
    options: SessionOptions,
    /// Bumped once per interrupt; never changes when no source is attached
    interrupts: watch::Receiver<u64>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(config: FrontendConfig, client: ClipClient, options: SessionOptions, out: W) -> Self {
        let (_, interrupts) = watch::channel(0);
        Self {
            config,
            client,
            app: App::new(),
            options,
            interrupts,
            out,
        }
    }

    /// Cancel processing and leave the gallery whenever `interrupts` changes.
    pub fn with_interrupts(mut self, interrupts: watch::Receiver<u64>) -> Self {
        self.interrupts = interrupts;
        self
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn print(&mut self, text: &str) -> FrontendResult<()> {
        write!(self.out, "{}", text)?;
        if !text.ends_with('\n') {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn flush_notifications(&mut self) -> FrontendResult<()> {
        for notification in self.app.take_notifications() {
            let line = render_notification(&notification);
            self.print(&line)?;
        }
        Ok(())
    }

    /// Pending notifications, then the idle input screen.
    fn return_to_input(&mut self) -> FrontendResult<()> {
        self.flush_notifications()?;
        let screen = render_input(false, None);
        self.print(&screen)
    }

    /// Submit a URL, follow processing, then show the gallery.
    ///
    /// Every way of ending back on the input screen (invalid URL, submit
    /// error, task failure, interrupt) returns an error that has already
    /// been shown as a notification.
    pub async fn run_generate<R>(&mut self, options: GenerateOptions, input: R) -> FrontendResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let submission = match self.app.begin_submit(&options.url) {
            Ok(submission) => submission,
            Err(e) => {
                self.return_to_input()?;
                return Err(e);
            }
        };

        let style = options
            .style
            .clone()
            .unwrap_or_else(|| self.config.default_style.clone());
        let rendered = render_input(true, Some(&submission.url));
        self.print(&rendered)?;

        let request = GenerateClipsRequest::new(submission.url, style);
        match self.client.submit(&request).await {
            Ok(response) => {
                info!(task_id = %response.task_id, "Clip generation started");
                self.app.job_started(&response);
            }
            Err(e) => {
                let error = FrontendError::from(e);
                self.app.submit_failed(&error);
                self.return_to_input()?;
                return Err(error);
            }
        }

        let followed = self.follow_task().await;
        if followed.as_ref().is_err_and(FrontendError::is_notified) {
            self.return_to_input()?;
        } else {
            self.flush_notifications()?;
        }
        followed?;

        if self.app.screen() == Screen::Gallery {
            if let Some(gallery) = self.app.gallery_mut() {
                if let Some(sort) = options.sort {
                    gallery.set_sort(sort);
                }
                if let Some(view) = options.view {
                    gallery.set_view(view);
                }
            }
            self.show_gallery(input).await?;
        }
        Ok(())
    }

    /// Poll the active task until it completes, fails, or is interrupted.
    async fn follow_task(&mut self) -> FrontendResult<()> {
        let Some(task_id) = self.app.task_id().map(str::to_string) else {
            return Ok(());
        };

        let poller = StatusPoller::new(self.client.clone(), self.config.poll_interval);
        let mut handle = poller.spawn(task_id);

        let display = self
            .options
            .live_progress
            .then(|| ProgressDisplay::new(self.app.processing()));
        if display.is_none() {
            let screen = render_processing(self.app.processing());
            self.print(&screen)?;
        }
        let mut last_step = self.app.processing().active_step().map(|s| s.label);
        let mut ended = None;

        loop {
            tokio::select! {
                update = handle.recv() => {
                    let Some(update) = update else {
                        warn!(task_id = %handle.task_id(), "Poller stopped without a result");
                        self.app.reset();
                        self.app.notify(Notification::error(
                            "Processing failed",
                            "Status polling stopped unexpectedly",
                        ));
                        ended = Some(FrontendError::TaskFailed(
                            "Status polling stopped unexpectedly".to_string(),
                        ));
                        break;
                    };
                    let failure = match &update.outcome {
                        PollOutcome::Failed(reason) => Some(reason.clone()),
                        _ => None,
                    };
                    match self.app.apply_update(update) {
                        Some(Transition::Progressed) => {
                            if let Some(display) = &display {
                                display.update(self.app.processing());
                            } else {
                                let step = self.app.processing().active_step().map(|s| s.label);
                                if step != last_step {
                                    let line = format!(
                                        "{:>3}% {}",
                                        self.app.processing().overall_progress().round() as u32,
                                        step.unwrap_or("processing")
                                    );
                                    self.print(&line)?;
                                    last_step = step;
                                }
                            }
                        }
                        Some(Transition::ShowGallery) => break,
                        Some(Transition::BackToInput) => {
                            ended = Some(FrontendError::TaskFailed(failure.unwrap_or_default()));
                            break;
                        }
                        None => {}
                    }
                }
                Ok(()) = self.interrupts.changed() => {
                    debug!(task_id = %handle.task_id(), "Interrupted");
                    handle.cancel();
                    self.app.reset();
                    self.app.notify(Notification::info("Cancelled", "Stopped following the task"));
                    ended = Some(FrontendError::Cancelled);
                    break;
                }
            }
        }

        if let Some(display) = display {
            if self.app.screen() == Screen::Gallery {
                display.update(self.app.processing());
                display.finish();
            } else {
                display.clear();
            }
        }
        handle.shutdown().await;
        match ended {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Simulated processing followed by the demo gallery. No network.
    pub async fn run_demo<R>(&mut self, input: R) -> FrontendResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut rng = StdRng::from_os_rng();
        self.run_demo_with(&mut rng, input).await
    }

    pub async fn run_demo_with<G, R>(&mut self, rng: &mut G, input: R) -> FrontendResult<()>
    where
        G: Rng,
        R: AsyncBufRead + Unpin,
    {
        self.app.start_local_processing();
        let display = self
            .options
            .live_progress
            .then(|| ProgressDisplay::new(self.app.processing()));

        let mut ticker = tokio::time::interval(self.config.simulation_tick);
        let mut last_step = None;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                Ok(()) = self.interrupts.changed() => {
                    debug!("Demo interrupted");
                    if let Some(display) = display {
                        display.clear();
                    }
                    self.app.reset();
                    self.app.notify(Notification::info("Cancelled", "Demo stopped"));
                    self.return_to_input()?;
                    return Err(FrontendError::Cancelled);
                }
            }
            let tick = self.app.processing_mut().simulate_tick(rng);

            if let Some(display) = &display {
                display.update(self.app.processing());
            } else {
                let step = self.app.processing().active_step().map(|s| s.label);
                if step.is_some() && step != last_step {
                    let line = format!(
                        "{:>3}% {}",
                        self.app.processing().overall_progress().round() as u32,
                        step.unwrap_or_default()
                    );
                    self.print(&line)?;
                    last_step = step;
                }
            }

            if tick == SimulationTick::Finished {
                break;
            }
        }
        if let Some(display) = display {
            display.finish();
        }

        self.app.show_gallery(demo_clips());
        self.flush_notifications()?;
        self.show_gallery(input).await
    }

    /// Print the gallery, then run the command loop when interactive.
    async fn show_gallery<R>(&mut self, input: R) -> FrontendResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let Some(gallery) = self.app.gallery() else {
            return Ok(());
        };
        let screen = render_gallery(gallery);
        self.print(&screen)?;

        if !self.options.interactive {
            return Ok(());
        }

        self.print(GALLERY_HELP)?;
        let mut lines = input.lines();
        loop {
            let next = tokio::select! {
                line = lines.next_line() => line?,
                Ok(()) = self.interrupts.changed() => {
                    debug!("Interrupted in the gallery");
                    break;
                }
            };
            let Some(raw) = next else {
                break;
            };
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let editing = self.app.gallery().is_some_and(|g| g.editor().is_some());
            let keep_going = if editing {
                match line.parse::<EditorCommand>() {
                    Ok(command) => {
                        self.handle_editor_command(command)?;
                        true
                    }
                    Err(e) => {
                        self.print(&format!("{e}. {EDITOR_HELP}"))?;
                        true
                    }
                }
            } else {
                match line.parse::<GalleryCommand>() {
                    Ok(command) => self.handle_gallery_command(command).await?,
                    Err(e) => {
                        self.print(&format!("{e}. {GALLERY_HELP}"))?;
                        true
                    }
                }
            };

            self.flush_notifications()?;
            if !keep_going {
                break;
            }
        }
        Ok(())
    }

    /// Returns false when the user quits.
    async fn handle_gallery_command(&mut self, command: GalleryCommand) -> FrontendResult<bool> {
        let Some(gallery) = self.app.gallery_mut() else {
            return Ok(false);
        };

        match command {
            GalleryCommand::Sort(mode) => {
                match mode {
                    Some(mode) => gallery.set_sort(mode),
                    None => gallery.toggle_sort(),
                }
                let screen = render_gallery(gallery);
                self.print(&screen)?;
            }
            GalleryCommand::View(view) => {
                gallery.set_view(view);
                let screen = render_gallery(gallery);
                self.print(&screen)?;
            }
            GalleryCommand::Edit(position) => match gallery.clip_at(position) {
                Ok(clip) => {
                    gallery.open_editor(&clip.id);
                    if let Some(editor) = gallery.editor() {
                        let screen = render_editor(editor);
                        self.print(&screen)?;
                    }
                    self.print(EDITOR_HELP)?;
                }
                Err(e) => self.app.notify(Notification::error("No such clip", e.to_string())),
            },
            GalleryCommand::Download(position) => match gallery.clip_at(position) {
                Ok(clip) => {
                    let path = clip_file_path(&self.config.download_dir, &clip.id);
                    let notification = match download_clip(&self.client, &clip.id, &path).await {
                        Ok(bytes) => Notification::success(
                            "Downloaded",
                            format!("{} ({} bytes) saved to {}", clip.title, bytes, path.display()),
                        ),
                        Err(e) => {
                            warn!(clip_id = %clip.id, error = %e, "Clip download failed");
                            Notification::error("Download failed", e.to_string())
                        }
                    };
                    self.app.notify(notification);
                }
                Err(e) => self.app.notify(Notification::error("No such clip", e.to_string())),
            },
            GalleryCommand::Help => self.print(GALLERY_HELP)?,
            GalleryCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn handle_editor_command(&mut self, command: EditorCommand) -> FrontendResult<()> {
        let Some(gallery) = self.app.gallery_mut() else {
            return Ok(());
        };

        if command == EditorCommand::Back {
            gallery.close_editor();
            let screen = render_gallery(gallery);
            return self.print(&screen);
        }
        if command == EditorCommand::Help {
            return self.print(EDITOR_HELP);
        }

        let Some(editor) = gallery.editor_mut() else {
            return Ok(());
        };
        let notification = match command {
            EditorCommand::Start(value) => {
                editor.set_start_trim(value);
                None
            }
            EditorCommand::End(value) => {
                editor.set_end_trim(value);
                None
            }
            EditorCommand::Volume(value) => {
                editor.set_volume(value);
                None
            }
            EditorCommand::Seek(value) => {
                editor.seek(value);
                None
            }
            EditorCommand::TogglePlay => {
                editor.toggle_playback();
                None
            }
            EditorCommand::Save => Some(editor.save()),
            EditorCommand::Export => Some(editor.export()),
            EditorCommand::Back | EditorCommand::Help => None,
        };
        let screen = render_editor(editor);

        self.print(&screen)?;
        if let Some(notification) = notification {
            self.app.notify(notification);
        }
        Ok(())
    }
}

/// One status poll, printed.
pub async fn run_status<W: Write>(client: &ClipClient, task_id: &str, out: &mut W) -> FrontendResult<TaskSnapshot> {
    let snapshot = client.poll_status(task_id).await?;

    writeln!(out, "Task      {}", snapshot.task_id)?;
    writeln!(out, "Status    {}", snapshot.status)?;
    if let Some(progress) = snapshot.progress {
        writeln!(out, "Progress  {:.0}%", progress)?;
    }
    if let Some(step) = &snapshot.current_step {
        writeln!(out, "Step      {}", step)?;
    }
    if let Some(clips) = &snapshot.clips {
        writeln!(out, "Clips     {}", clips.len())?;
    }
    if let Some(error) = &snapshot.error {
        writeln!(out, "Error     {}", error)?;
    }
    Ok(snapshot)
}

/// Backend health probe, printed. Returns whether the backend is up.
pub async fn run_health<W: Write>(client: &ClipClient, out: &mut W) -> FrontendResult<bool> {
    let healthy = client.health_check().await;
    if healthy {
        writeln!(out, "Backend at {} is healthy", client.base_url())?;
    } else {
        writeln!(out, "Backend at {} is unreachable or unhealthy", client.base_url())?;
    }
    Ok(healthy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use vclip_client::ClientConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(server_uri: &str, download_dir: &Path, interactive: bool) -> Session<Vec<u8>> {
        let mut config = FrontendConfig::default();
        config.client = config.client.with_base_url(server_uri);
        config.poll_interval = Duration::from_millis(10);
        config.simulation_tick = Duration::from_millis(1);
        config.download_dir = download_dir.to_path_buf();

        let client = ClipClient::new(config.client.clone()).unwrap();
        let options = SessionOptions {
            live_progress: false,
            interactive,
        };
        Session::new(config, client, options, Vec::new())
    }

    fn printed(session: &Session<Vec<u8>>) -> String {
        String::from_utf8_lossy(session.output()).into_owned()
    }

    async fn mount_happy_backend(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/generate-clips"))
            .and(body_json(serde_json::json!({
                "url": "https://youtube.com/watch?v=abc",
                "style": "mrbeast"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "pending"
            })))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "analyzing", "progress": 50
            })))
            .up_to_n_times(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1",
                "status": "completed",
                "progress": 100,
                "clips": [
                    {"id": "c1", "title": "Peak reaction moment", "duration": "0:28",
                     "viralScore": 94, "startTime": 754, "endTime": 782},
                    {"id": "c2", "title": "Quiet intro", "duration": "0:20",
                     "viralScore": 35, "startTime": 10, "endTime": 30}
                ]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_generate_reaches_gallery() {
        let server = MockServer::start().await;
        mount_happy_backend(&server).await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session(&server.uri(), dir.path(), false);
        session
            .run_generate(
                GenerateOptions {
                    url: "https://youtube.com/watch?v=abc".into(),
                    view: Some(ViewMode::List),
                    ..Default::default()
                },
                &b""[..],
            )
            .await
            .unwrap();

        assert_eq!(session.app().screen(), Screen::Gallery);
        let out = printed(&session);
        assert!(out.contains("Processing Your Video"));
        assert!(out.contains("Finding Viral Moments"));
        assert!(out.contains("Found 2 viral moments"));
        assert!(out.contains("12:34 - 13:02"));
    }

    #[tokio::test]
    async fn test_generate_failure_returns_to_input() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-clips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "pending"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "failed", "error": "video unavailable"
            })))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session(&server.uri(), dir.path(), false);
        let result = session
            .run_generate(
                GenerateOptions {
                    url: "https://youtube.com/watch?v=abc".into(),
                    ..Default::default()
                },
                &b""[..],
            )
            .await;

        match result {
            Err(FrontendError::TaskFailed(reason)) => assert_eq!(reason, "video unavailable"),
            other => panic!("expected a task failure, got {:?}", other),
        }
        assert_eq!(session.app().screen(), Screen::Input);
        let out = printed(&session);
        assert!(out.contains("Processing failed: video unavailable"));
        assert!(out.trim_end().ends_with("grab attention."));
    }

    #[tokio::test]
    async fn test_interrupt_cancels_processing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-clips"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "pending"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "downloading"
            })))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let (interrupt, interrupts) = watch::channel(0u64);
        let mut session = session(&server.uri(), dir.path(), false).with_interrupts(interrupts);
        session.config.poll_interval = Duration::from_secs(60);
        interrupt.send_modify(|presses| *presses += 1);

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            session.run_generate(
                GenerateOptions {
                    url: "https://youtube.com/watch?v=abc".into(),
                    ..Default::default()
                },
                &b""[..],
            ),
        )
        .await
        .expect("interrupt did not stop processing");

        assert!(matches!(result, Err(FrontendError::Cancelled)));
        assert_eq!(session.app().screen(), Screen::Input);
        assert_eq!(session.app().task_id(), None);
        assert!(printed(&session).contains("Cancelled: Stopped following the task"));
    }

    #[tokio::test]
    async fn test_interrupt_leaves_gallery_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let (interrupt, interrupts) = watch::channel(0u64);
        let mut session = session("http://127.0.0.1:9", dir.path(), true).with_interrupts(interrupts);
        session.app.show_gallery(demo_clips());

        // Input that never delivers a line, like a terminal nobody types into.
        let (_keyboard, terminal) = tokio::io::duplex(64);
        interrupt.send_modify(|presses| *presses += 1);

        tokio::time::timeout(
            Duration::from_secs(5),
            session.show_gallery(tokio::io::BufReader::new(terminal)),
        )
        .await
        .expect("interrupt did not leave the gallery")
        .unwrap();

        assert!(printed(&session).contains(GALLERY_HELP));
        assert_eq!(session.app().screen(), Screen::Gallery);
    }

    #[tokio::test]
    async fn test_submit_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-clips"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session(&server.uri(), dir.path(), false);
        let result = session
            .run_generate(
                GenerateOptions {
                    url: "https://youtube.com/watch?v=abc".into(),
                    ..Default::default()
                },
                &b""[..],
            )
            .await;

        assert!(matches!(result, Err(FrontendError::Client(_))));
        assert!(result.unwrap_err().is_notified());
        assert_eq!(session.app().screen(), Screen::Input);
        assert!(printed(&session).contains("Failed to start clip generation: Service Unavailable"));
    }

    #[tokio::test]
    async fn test_invalid_url_never_reaches_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session(&server.uri(), dir.path(), false);
        let result = session
            .run_generate(
                GenerateOptions {
                    url: "   ".into(),
                    ..Default::default()
                },
                &b""[..],
            )
            .await;

        assert!(matches!(result, Err(FrontendError::EmptyUrl)));
        assert!(printed(&session).contains("Invalid URL"));
    }

    #[tokio::test]
    async fn test_gallery_commands_download_and_edit() {
        let server = MockServer::start().await;
        mount_happy_backend(&server).await;
        Mock::given(method("GET"))
            .and(path("/clips/c1/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let commands = b"download 1\nedit 1\nstart 10\nvolume 150\nsave\nback\nsort time\nquit\nedit 2\n";
        let mut session = session(&server.uri(), dir.path(), true);
        session
            .run_generate(
                GenerateOptions {
                    url: "https://youtube.com/watch?v=abc".into(),
                    ..Default::default()
                },
                &commands[..],
            )
            .await
            .unwrap();

        let saved = std::fs::read(dir.path().join("c1.mp4")).unwrap();
        assert_eq!(saved, b"mp4-bytes");

        let out = printed(&session);
        assert!(out.contains("Start Point    0:03 (10.0%)"));
        assert!(out.contains("Volume         100%"));
        assert!(out.contains("Changes kept locally"));
        assert!(out.contains("Sort: By Time"));

        let gallery = session.app().gallery().unwrap();
        assert!(gallery.editor().is_none());
        assert_eq!(gallery.sort_mode(), SortMode::Time);
    }

    #[tokio::test]
    async fn test_unknown_clip_is_reported() {
        let server = MockServer::start().await;
        mount_happy_backend(&server).await;
        let dir = tempfile::tempdir().unwrap();

        let mut session = session(&server.uri(), dir.path(), true);
        session
            .run_generate(
                GenerateOptions {
                    url: "https://youtube.com/watch?v=abc".into(),
                    ..Default::default()
                },
                &b"edit 7\nquit\n"[..],
            )
            .await
            .unwrap();

        assert!(printed(&session).contains("No clip #7 in the gallery"));
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clips/c9/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();
        let client = ClipClient::new(ClientConfig::default().with_base_url(server.uri())).unwrap();

        let target = clip_file_path(&dir.path().join("clips"), "c9");
        let written = download_clip(&client, "c9", &target).await.unwrap();

        assert_eq!(written, 64);
        assert_eq!(std::fs::metadata(&target).unwrap().len(), 64);
    }

    #[test]
    fn test_clip_file_path_is_sanitized() {
        let path = clip_file_path(Path::new("out"), "../c 1");
        assert_eq!(path, Path::new("out").join("___c_1.mp4"));
    }

    #[tokio::test]
    async fn test_demo_runs_without_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session("http://127.0.0.1:9", dir.path(), false);
        let mut rng = StdRng::seed_from_u64(7);

        session.run_demo_with(&mut rng, &b""[..]).await.unwrap();

        assert_eq!(session.app().screen(), Screen::Gallery);
        assert_eq!(session.app().gallery().unwrap().len(), 6);
        let out = printed(&session);
        assert!(out.contains("Rendering Clips"));
        assert!(out.contains("Found 6 viral moments"));
    }

    #[tokio::test]
    async fn test_status_and_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "task_id": "t1", "status": "transcribing", "progress": 20, "current_step": "whisper"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "healthy"})))
            .mount(&server)
            .await;
        let client = ClipClient::new(ClientConfig::default().with_base_url(server.uri())).unwrap();

        let mut out = Vec::new();
        let snapshot = run_status(&client, "t1", &mut out).await.unwrap();
        assert_eq!(snapshot.progress, Some(20.0));
        assert!(run_health(&client, &mut out).await.unwrap());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Status    transcribing"));
        assert!(text.contains("Step      whisper"));
        assert!(text.contains("is healthy"));
    }
}
