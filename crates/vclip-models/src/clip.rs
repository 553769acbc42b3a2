//! Generated clip model and viral score bands.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp::{format_clock, format_time_range};

/// One generated short-form clip.
///
/// Clips are immutable once received and only live as long as the
/// completed task they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedClip {
    /// Opaque clip identifier
    pub id: String,
    /// Clip title
    pub title: String,
    /// Human readable duration (e.g. "0:28")
    pub duration: String,
    /// Predicted engagement score (0-100)
    #[serde(deserialize_with = "deserialize_score")]
    pub viral_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Start offset in the source video, in seconds
    pub start_time: f64,
    /// End offset in the source video, in seconds
    pub end_time: f64,
}

impl GeneratedClip {
    /// Score band used for display.
    pub fn band(&self) -> ViralBand {
        ViralBand::from_score(self.viral_score)
    }

    /// Start offset formatted as `M:SS` (or `H:MM:SS`).
    pub fn start_label(&self) -> String {
        format_clock(self.start_time)
    }

    /// End offset formatted as `M:SS` (or `H:MM:SS`).
    pub fn end_label(&self) -> String {
        format_clock(self.end_time)
    }

    /// Original time range, e.g. `12:34 - 13:02`.
    pub fn time_range(&self) -> String {
        format_time_range(self.start_time, self.end_time)
    }
}

/// Scores arrive as JSON numbers; round and clamp them into 0..=100.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

/// Display classification of a viral score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViralBand {
    Low,
    Medium,
    High,
    Viral,
}

impl ViralBand {
    /// Bands from highest to lowest, the order the legend shows them in.
    pub const LEGEND: &'static [ViralBand] = &[
        ViralBand::Viral,
        ViralBand::High,
        ViralBand::Medium,
        ViralBand::Low,
    ];

    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ViralBand::Viral,
            60..=79 => ViralBand::High,
            40..=59 => ViralBand::Medium,
            _ => ViralBand::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViralBand::Low => "Low",
            ViralBand::Medium => "Medium",
            ViralBand::High => "High",
            ViralBand::Viral => "Viral",
        }
    }

    /// Score range shown in the gallery legend.
    pub fn range_label(&self) -> &'static str {
        match self {
            ViralBand::Low => "0-39%",
            ViralBand::Medium => "40-59%",
            ViralBand::High => "60-79%",
            ViralBand::Viral => "80-100%",
        }
    }
}

impl fmt::Display for ViralBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
