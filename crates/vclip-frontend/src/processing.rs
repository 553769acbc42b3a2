//! Processing progress view state.
//!
//! Four fixed steps, fed either by backend status snapshots or, when no
//! backend is involved, by a local simulator that advances them randomly.

use rand::Rng;

use vclip_models::{TaskSnapshot, TaskStatus};

/// Progress added to the active step when the backend reports none.
const SYNTHETIC_INCREMENT: f64 = 5.0;
/// Synthetic progress never claims a step is finished.
const SYNTHETIC_CAP: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Active,
    Complete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingStep {
    pub id: &'static str,
    pub label: &'static str,
    pub status: StepStatus,
    /// 0-100
    pub progress: f64,
}

impl ProcessingStep {
    const fn pending(id: &'static str, label: &'static str) -> Self {
        Self {
            id,
            label,
            status: StepStatus::Pending,
            progress: 0.0,
        }
    }

    fn set(&mut self, status: StepStatus, progress: f64) {
        self.status = status;
        self.progress = progress.clamp(0.0, 100.0);
    }
}

pub const STEP_COUNT: usize = 4;

/// Outcome of one simulator tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationTick {
    Running,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingView {
    steps: [ProcessingStep; STEP_COUNT],
    /// Step the simulator is working on
    current: usize,
    /// Set once the backend reports completion
    completed: bool,
    /// Step label reported by the backend
    backend_step: Option<String>,
}

impl Default for ProcessingView {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingView {
    pub fn new() -> Self {
        Self {
            steps: [
                ProcessingStep::pending("download", "Downloading Video"),
                ProcessingStep::pending("transcribe", "Transcribing Audio"),
                ProcessingStep::pending("analyze", "Finding Viral Moments"),
                ProcessingStep::pending("render", "Rendering Clips"),
            ],
            current: 0,
            completed: false,
            backend_step: None,
        }
    }

    pub fn steps(&self) -> &[ProcessingStep] {
        &self.steps
    }

    /// The step currently marked active, if any.
    pub fn active_step(&self) -> Option<&ProcessingStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Active)
    }

    pub fn backend_step(&self) -> Option<&str> {
        self.backend_step.as_deref()
    }

    /// Mean of the step progresses, or exactly 100 once the backend said so.
    pub fn overall_progress(&self) -> f64 {
        if self.completed {
            return 100.0;
        }
        self.steps.iter().map(|s| s.progress).sum::<f64>() / STEP_COUNT as f64
    }

    /// Apply a backend status snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &TaskSnapshot) {
        if let Some(step) = snapshot.current_step.as_deref().filter(|s| !s.trim().is_empty()) {
            self.backend_step = Some(step.to_string());
        }
        self.apply_status(snapshot.status, snapshot.progress);
    }

    /// Drive the steps from a backend status.
    ///
    /// Steps before the active one are complete, the active one takes the
    /// reported progress, later ones are pending.
    pub fn apply_status(&mut self, status: TaskStatus, progress: Option<f64>) {
        if status == TaskStatus::Completed {
            for step in &mut self.steps {
                step.set(StepStatus::Complete, 100.0);
            }
            self.current = STEP_COUNT - 1;
            self.completed = true;
            return;
        }

        let active = status.step_index();
        for (index, step) in self.steps.iter_mut().enumerate() {
            if index < active {
                step.set(StepStatus::Complete, 100.0);
            } else if index == active {
                let value = match progress.filter(|p| p.is_finite()) {
                    Some(reported) => reported,
                    None => (step.progress + SYNTHETIC_INCREMENT).min(SYNTHETIC_CAP),
                };
                step.set(StepStatus::Active, value);
            } else {
                step.set(StepStatus::Pending, 0.0);
            }
        }
        self.current = active;
    }

    /// Advance the demo simulator by one tick.
    pub fn simulate_tick<R: Rng>(&mut self, rng: &mut R) -> SimulationTick {
        let Some(step) = self.steps.get_mut(self.current) else {
            return SimulationTick::Finished;
        };

        if step.status == StepStatus::Complete {
            return SimulationTick::Finished;
        }

        if step.status == StepStatus::Pending {
            step.status = StepStatus::Active;
        }

        if step.progress < 100.0 {
            step.progress = (step.progress + rng.random_range(2.0..10.0)).min(100.0);
            return SimulationTick::Running;
        }

        step.status = StepStatus::Complete;
        if self.current + 1 < STEP_COUNT {
            self.current += 1;
            SimulationTick::Running
        } else {
            SimulationTick::Finished
        }
    }
}
