//! `vclip` command line client.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{debug, info};

use vclip_client::ClipClient;
use vclip_frontend::gallery::{SortMode, ViewMode};
use vclip_frontend::logging::init_tracing;
use vclip_frontend::session::{
    clip_file_path, download_clip, run_health, run_status, watch_ctrl_c,
};
use vclip_frontend::{FrontendConfig, FrontendResult, GenerateOptions, Session, SessionOptions};

#[derive(Parser)]
#[command(name = "vclip", version, about = "Turn long videos into viral clips")]
struct Cli {
    /// Clip service base URL (overrides VCLIP_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a video and follow it to the clip gallery
    Generate {
        /// YouTube, Twitch or Kick link
        url: String,

        /// Caption style
        #[arg(long)]
        style: Option<String>,

        /// Gallery order: score or time
        #[arg(long)]
        sort: Option<SortMode>,

        /// Gallery layout: grid or list
        #[arg(long)]
        view: Option<ViewMode>,

        /// Print the gallery and exit instead of reading commands
        #[arg(long)]
        no_interactive: bool,

        /// Milliseconds between status polls
        #[arg(long)]
        poll_interval_ms: Option<u64>,
    },
    /// Print the status of a task once
    Status {
        task_id: String,
    },
    /// Download a rendered clip
    Download {
        clip_id: String,

        /// Output file (default: <download dir>/<clip_id>.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that the clip service is up
    Health,
    /// Simulated processing with sample clips, no backend needed
    Demo {
        #[arg(long)]
        no_interactive: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = FrontendConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.client.base_url = api_url;
    }
    debug!("Frontend config: {:?}", config);

    let client = ClipClient::new(config.client.clone()).context("Failed to create clip service client")?;
    let stdout_is_terminal = std::io::stdout().is_terminal();
    let stdin_is_terminal = std::io::stdin().is_terminal();

    match cli.command {
        Command::Generate {
            url,
            style,
            sort,
            view,
            no_interactive,
            poll_interval_ms,
        } => {
            if let Some(ms) = poll_interval_ms.filter(|ms| *ms > 0) {
                config.poll_interval = Duration::from_millis(ms);
            }
            let options = SessionOptions {
                live_progress: stdout_is_terminal,
                interactive: !no_interactive && stdin_is_terminal,
            };
            let mut session =
                Session::new(config, client, options, std::io::stdout()).with_interrupts(watch_ctrl_c());
            let input = BufReader::new(tokio::io::stdin());
            let result = session
                .run_generate(
                    GenerateOptions {
                        url,
                        style,
                        sort,
                        view,
                    },
                    input,
                )
                .await;
            finish_session(result)?;
        }
        Command::Status { task_id } => {
            run_status(&client, &task_id, &mut std::io::stdout()).await?;
        }
        Command::Download { clip_id, output } => {
            let path = output.unwrap_or_else(|| clip_file_path(&config.download_dir, &clip_id));
            let bytes = download_clip(&client, &clip_id, &path).await?;
            println!("Saved {} bytes to {}", bytes, path.display());
        }
        Command::Health => {
            if !run_health(&client, &mut std::io::stdout()).await? {
                bail!("clip service at {} is not healthy", client.base_url());
            }
        }
        Command::Demo { no_interactive } => {
            let options = SessionOptions {
                live_progress: stdout_is_terminal,
                interactive: !no_interactive && stdin_is_terminal,
            };
            let mut session =
                Session::new(config, client, options, std::io::stdout()).with_interrupts(watch_ctrl_c());
            let result = session.run_demo(BufReader::new(tokio::io::stdin())).await;
            finish_session(result)?;
        }
    }

    info!("vclip finished");
    Ok(())
}

/// Exit once a session flow is over. Errors it returns were already shown
/// on screen, so they only set the exit status; output failures go back to
/// `main`.
///
/// Exits the process directly: an interrupted gallery leaves a blocking stdin
/// read behind that would otherwise keep the runtime from shutting down.
fn finish_session(result: FrontendResult<()>) -> anyhow::Result<()> {
    let code = match result {
        Ok(()) => 0,
        Err(e) if e.is_notified() => {
            debug!(error = %e, "Session ended on the input screen");
            1
        }
        Err(e) => return Err(e.into()),
    };
    info!("vclip finished");
    std::process::exit(code);
}
