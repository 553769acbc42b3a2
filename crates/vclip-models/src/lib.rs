//! Shared data models for the ViralClip client.
//!
//! This crate provides Serde-serializable types for:
//! - Clip generation requests and task status snapshots
//! - Generated clips and their viral score bands
//! - Clock formatting for clip time ranges
//! - Source platform detection for submitted URLs

pub mod clip;
pub mod task;
pub mod timestamp;
pub mod utils;

// Re-export common types
pub use clip::{GeneratedClip, ViralBand};
pub use task::{
    GenerateClipsRequest, GenerateClipsResponse, StatusParseError, TaskSnapshot, TaskStatus,
    DEFAULT_STYLE,
};
pub use timestamp::{format_clock, format_time_range};
pub use utils::{Platform, SUPPORTED_SOURCES};
