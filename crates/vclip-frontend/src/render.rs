//! Plain-text screens.
//!
//! Every function returns a `String` so screens can be checked in tests and
//! written wherever the caller wants.

use std::fmt::Write;

use vclip_models::{GeneratedClip, Platform, ViralBand, SUPPORTED_SOURCES};

use crate::editor::ClipEditor;
use crate::gallery::{Gallery, ViewMode};
use crate::notify::{Notification, NotificationLevel};
use crate::processing::{ProcessingView, StepStatus};

const BAR_WIDTH: usize = 30;
const GRID_COLUMNS: usize = 3;
const GRID_CELL_WIDTH: usize = 34;
const TITLE_WIDTH: usize = 60;

/// Truncate to `max` characters, ending with "…" when cut.
pub fn fit_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    text.chars().take(max - 1).collect::<String>() + "…"
}

/// `[#####.....]` style bar for a 0-100 value.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

const HERO_BADGE: &str = "Free & Open Source • Local AI Processing";
const HERO_TITLE: &str = "Turn Long Videos into Viral Shorts Automatically";
const HERO_SUBTITLE: &str = "AI-powered video clipping that finds the best moments, adds dynamic captions, \
and exports perfect 9:16 shorts for TikTok, YouTube Shorts, and Instagram Reels.";
const HERO_PILLS: [&str; 4] = [
    "Instant Processing",
    "Smart Face Tracking",
    "Viral Score Detection",
    "MrBeast-Style Captions",
];

/// (title, description) shown under the URL box.
const FEATURE_CARDS: [(&str, &str); 3] = [
    (
        "AI-Powered Detection",
        "Our algorithm analyzes audio spikes, keywords, and engagement patterns to find the most viral-worthy moments.",
    ),
    (
        "Smart Face Tracking",
        "Automatic 9:16 cropping that follows the speaker's face using MediaPipe, perfect for talking-head content.",
    ),
    (
        "Dynamic Captions",
        "Word-level timestamps with MrBeast-style animated captions that pop and grab attention.",
    ),
];

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() { 0 } else { line.chars().count() + 1 };
        if needed > 0 && needed + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

pub fn render_input(submitting: bool, url: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[ {} ]", HERO_BADGE);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", HERO_TITLE);
    for line in wrap_words(HERO_SUBTITLE, TITLE_WIDTH + 10) {
        let _ = writeln!(out, "{}", line);
    }
    let _ = writeln!(out, "{}", HERO_PILLS.map(|pill| format!("✦ {pill}")).join("   "));
    let _ = writeln!(out);
    let _ = writeln!(out, "Supports {} • AI-powered viral moment detection", SUPPORTED_SOURCES);
    if let Some(url) = url {
        let platform = Platform::detect(url)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "Link".to_string());
        let _ = writeln!(out, "[{}] {}", platform, url);
    }
    if submitting {
        let _ = writeln!(out, "Processing…");
        return out;
    }

    for (title, description) in FEATURE_CARDS {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", title);
        for line in wrap_words(description, TITLE_WIDTH) {
            let _ = writeln!(out, "    {}", line);
        }
    }
    out
}

pub fn render_processing(view: &ProcessingView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Processing Your Video");
    let _ = writeln!(out, "Our AI is analyzing and generating viral clips");
    let _ = writeln!(out);

    let overall = view.overall_progress();
    let _ = writeln!(
        out,
        "Overall Progress {} {:>3}%",
        progress_bar(overall, BAR_WIDTH),
        overall.round() as u32
    );
    if let Some(step) = view.backend_step() {
        let _ = writeln!(out, "Now: {}", step);
    }
    let _ = writeln!(out);

    for step in view.steps() {
        let marker = match step.status {
            StepStatus::Complete => "✓",
            StepStatus::Active => "›",
            StepStatus::Pending => " ",
        };
        if step.status == StepStatus::Pending {
            let _ = writeln!(out, " {} {}", marker, step.label);
        } else {
            let _ = writeln!(
                out,
                " {} {:<22} {} {:>3}%",
                marker,
                step.label,
                progress_bar(step.progress, BAR_WIDTH / 2),
                step.progress.round() as u32
            );
        }
    }
    out
}

fn score_legend() -> String {
    ViralBand::LEGEND
        .iter()
        .map(|band| format!("{} {}", band.range_label(), band.label()))
        .collect::<Vec<_>>()
        .join("  ")
}

fn card_lines(position: usize, clip: &GeneratedClip) -> Vec<String> {
    vec![
        format!("#{} {} • {}%", position, clip.duration, clip.viral_score),
        format!("{} Potential", clip.band()),
        clip.time_range(),
        fit_text(&clip.title, GRID_CELL_WIDTH - 2),
    ]
}

pub fn render_gallery(gallery: &Gallery) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated Clips");
    let _ = writeln!(out, "Found {} viral moments", gallery.len());
    let _ = writeln!(
        out,
        "Sort: {}  View: {}",
        gallery.sort_mode().label(),
        gallery.view_mode()
    );
    let _ = writeln!(out, "Viral Score: {}", score_legend());
    let _ = writeln!(out);

    let clips = gallery.sorted();
    match gallery.view_mode() {
        ViewMode::List => {
            for (index, clip) in clips.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>2}. [{:>3}% {:<6}] {:<15} {:>5}  {}",
                    index + 1,
                    clip.viral_score,
                    clip.band().label(),
                    clip.time_range(),
                    clip.duration,
                    fit_text(&clip.title, TITLE_WIDTH)
                );
            }
        }
        ViewMode::Grid => {
            let numbered: Vec<_> = clips.iter().enumerate().collect();
            for row in numbered.chunks(GRID_COLUMNS) {
                let cards: Vec<Vec<String>> = row
                    .iter()
                    .map(|(index, clip)| card_lines(index + 1, clip))
                    .collect();
                let height = cards.iter().map(Vec::len).max().unwrap_or(0);
                for line in 0..height {
                    let cells: Vec<String> = cards
                        .iter()
                        .map(|card| {
                            let text = card.get(line).map(String::as_str).unwrap_or("");
                            format!("{:<width$}", text, width = GRID_CELL_WIDTH)
                        })
                        .collect();
                    let _ = writeln!(out, "{}", cells.join("").trim_end());
                }
                let _ = writeln!(out);
            }
        }
    }
    out
}

pub fn render_editor(editor: &ClipEditor) -> String {
    let clip = editor.clip();
    let mut out = String::new();
    let _ = writeln!(out, "← Back to Clips");
    let _ = writeln!(out, "{}", clip.title);
    let _ = writeln!(out, "{}% Viral Score", clip.viral_score);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} {} {} / {}",
        if editor.is_playing() { "❚❚" } else { "▶" },
        progress_bar(editor.playhead(), BAR_WIDTH),
        editor.playhead_label(),
        editor.total_label()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Clip Details");
    let _ = writeln!(out, "  Original Time  {}", clip.time_range());
    let _ = writeln!(out, "  Duration       {}", clip.duration);
    let _ = writeln!(out, "Trim Clip");
    let _ = writeln!(out, "  Start Point    {} ({:.1}%)", editor.start_label(), editor.start_trim());
    let _ = writeln!(out, "  End Point      {} ({:.1}%)", editor.end_label(), editor.end_trim());
    let _ = writeln!(out, "  New Duration   {}", editor.trimmed_duration_label());
    let _ = writeln!(out, "Audio");
    let _ = writeln!(out, "  Volume         {:.0}%", editor.volume());
    let _ = writeln!(out, "Caption Style");
    let _ = writeln!(out, "  VIRAL MOMENT");
    let _ = writeln!(out, "  MrBeast-style animated captions will be applied");
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "done",
        NotificationLevel::Error => "error",
    };
    format!(
        "[{} {}] {}: {}",
        tag,
        notification.raised_at.format("%H:%M:%S"),
        notification.title,
        notification.message
    )
}
