//! Local clip editor: trim points, volume and playhead.
//!
//! Nothing here talks to the backend. Save and export only acknowledge the
//! request, there is no endpoint to send edits to.

use vclip_models::{format_clock, GeneratedClip};

use crate::notify::Notification;

/// Length the trim percentages are measured against, in seconds.
pub const ASSUMED_CLIP_DURATION_SECS: f64 = 30.0;
/// Minimum distance between the trim points, in percent.
pub const MIN_TRIM_GAP: f64 = 5.0;

const TRIM_STEP: f64 = 0.5;
const VOLUME_STEP: f64 = 1.0;
const PLAYHEAD_STEP: f64 = 0.1;
const DEFAULT_VOLUME: f64 = 80.0;

fn snap(value: f64, step: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value / step).round() * step
}

fn percent_to_clock(percent: f64) -> String {
    format_clock(percent / 100.0 * ASSUMED_CLIP_DURATION_SECS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipEditor {
    clip: GeneratedClip,
    start_trim: f64,
    end_trim: f64,
    volume: f64,
    playhead: f64,
    playing: bool,
}

impl ClipEditor {
    pub fn new(clip: GeneratedClip) -> Self {
        Self {
            clip,
            start_trim: 0.0,
            end_trim: 100.0,
            volume: DEFAULT_VOLUME,
            playhead: 0.0,
            playing: false,
        }
    }

    pub fn clip(&self) -> &GeneratedClip {
        &self.clip
    }

    pub fn start_trim(&self) -> f64 {
        self.start_trim
    }

    pub fn end_trim(&self) -> f64 {
        self.end_trim
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Move the start point; clamped to `[0, end - 5]`.
    pub fn set_start_trim(&mut self, percent: f64) -> f64 {
        self.start_trim = snap(percent, TRIM_STEP).clamp(0.0, self.end_trim - MIN_TRIM_GAP);
        self.start_trim
    }

    /// Move the end point; clamped to `[start + 5, 100]`.
    pub fn set_end_trim(&mut self, percent: f64) -> f64 {
        self.end_trim = snap(percent, TRIM_STEP).clamp(self.start_trim + MIN_TRIM_GAP, 100.0);
        self.end_trim
    }

    pub fn set_volume(&mut self, volume: f64) -> f64 {
        self.volume = snap(volume, VOLUME_STEP).clamp(0.0, 100.0);
        self.volume
    }

    pub fn seek(&mut self, percent: f64) -> f64 {
        self.playhead = snap(percent, PLAYHEAD_STEP).clamp(0.0, 100.0);
        self.playhead
    }

    pub fn toggle_playback(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    pub fn start_label(&self) -> String {
        percent_to_clock(self.start_trim)
    }

    pub fn end_label(&self) -> String {
        percent_to_clock(self.end_trim)
    }

    pub fn playhead_label(&self) -> String {
        percent_to_clock(self.playhead)
    }

    pub fn total_label(&self) -> String {
        format_clock(ASSUMED_CLIP_DURATION_SECS)
    }

    /// Length of the trimmed clip.
    pub fn trimmed_duration_label(&self) -> String {
        percent_to_clock(self.end_trim - self.start_trim)
    }

    /// Placeholder: edits stay local.
    pub fn save(&self) -> Notification {
        Notification::info(
            "Changes kept locally",
            format!(
                "Trim {} - {}, volume {}% for \"{}\" (not sent to the server)",
                self.start_label(),
                self.end_label(),
                self.volume,
                self.clip.title
            ),
        )
    }

    /// Placeholder: there is no export endpoint.
    pub fn export(&self) -> Notification {
        Notification::info(
            "Export not available",
            format!("Use download to fetch the rendered clip \"{}\"", self.clip.title),
        )
    }
}
