//! Frontend configuration.

use std::path::PathBuf;
use std::time::Duration;

use vclip_client::ClientConfig;
use vclip_models::DEFAULT_STYLE;

/// Frontend configuration.
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Clip service connection settings
    pub client: ClientConfig,
    /// Period between status polls
    pub poll_interval: Duration,
    /// Period between simulated progress ticks (demo mode)
    pub simulation_tick: Duration,
    /// Caption style sent with every submission
    pub default_style: String,
    /// Where downloaded clips are written
    pub download_dir: PathBuf,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            poll_interval: Duration::from_millis(2000),
            simulation_tick: Duration::from_millis(150),
            default_style: DEFAULT_STYLE.to_string(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl FrontendConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            client: ClientConfig::from_env(),
            poll_interval: Duration::from_millis(
                std::env::var("VCLIP_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|ms: &u64| *ms > 0)
                    .unwrap_or(2000),
            ),
            simulation_tick: Duration::from_millis(150),
            default_style: std::env::var("VCLIP_DEFAULT_STYLE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            download_dir: std::env::var("VCLIP_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
