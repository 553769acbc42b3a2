//! Source platform detection for submitted URLs.

use std::fmt;

/// Platforms the service accepts source videos from.
pub const SUPPORTED_SOURCES: &str = "YouTube videos, Twitch VODs, and Kick streams";

/// Streaming platform a source URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Youtube,
    Twitch,
    Kick,
}

impl Platform {
    /// Guess the platform from a URL. This is a display hint only, the
    /// backend decides what it can download.
    pub fn detect(url: &str) -> Option<Self> {
        let url = url.to_ascii_lowercase();
        if url.contains("youtube") || url.contains("youtu.be") {
            Some(Platform::Youtube)
        } else if url.contains("twitch") {
            Some(Platform::Twitch)
        } else if url.contains("kick") {
            Some(Platform::Kick)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube",
            Platform::Twitch => "Twitch",
            Platform::Kick => "Kick",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
