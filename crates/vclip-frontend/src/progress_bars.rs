//! Live terminal progress for the processing screen.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::processing::{ProcessingView, StepStatus};

/// One overall bar plus one bar per processing step, mirrored from a
/// [`ProcessingView`].
pub struct ProgressDisplay {
    multi: MultiProgress,
    overall: ProgressBar,
    steps: Vec<ProgressBar>,
}

impl ProgressDisplay {
    pub fn new(view: &ProcessingView) -> Self {
        Self::with_target(view, ProgressDrawTarget::stdout())
    }

    #[cfg(test)]
    fn hidden(view: &ProcessingView) -> Self {
        Self::with_target(view, ProgressDrawTarget::hidden())
    }

    fn with_target(view: &ProcessingView, target: ProgressDrawTarget) -> Self {
        let multi = MultiProgress::with_draw_target(target);

        let overall_style = ProgressStyle::with_template("{prefix:<22} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let step_style = ProgressStyle::with_template("  {prefix:<20} [{bar:30.green/white}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        let overall = multi.add(ProgressBar::new(100));
        overall.set_style(overall_style);
        overall.set_prefix("Overall Progress");

        let steps = view
            .steps()
            .iter()
            .map(|step| {
                let bar = multi.add(ProgressBar::new(100));
                bar.set_style(step_style.clone());
                bar.set_prefix(step.label);
                bar
            })
            .collect();

        let display = Self { multi, overall, steps };
        display.update(view);
        display
    }

    pub fn update(&self, view: &ProcessingView) {
        self.overall.set_position(view.overall_progress().round() as u64);
        if let Some(step) = view.backend_step() {
            self.overall.set_message(step.to_string());
        }

        for (bar, step) in self.steps.iter().zip(view.steps()) {
            bar.set_position(step.progress.round() as u64);
            let status = match step.status {
                StepStatus::Pending => "waiting",
                StepStatus::Active => "working",
                StepStatus::Complete => "done",
            };
            bar.set_message(status);
        }
    }

    /// Leave the bars on screen in their final state.
    pub fn finish(self) {
        self.overall.finish();
        for bar in &self.steps {
            bar.finish();
        }
    }

    /// Remove the bars from the screen.
    pub fn clear(self) {
        let _ = self.multi.clear();
    }
}
