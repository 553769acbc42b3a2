//! Terminal frontend for ViralClip.
//!
//! This crate provides:
//! - Application state machine (input, processing, gallery)
//! - Task status poller with cancellation
//! - Processing progress view and demo simulator
//! - Clip gallery and local trim/volume editor
//! - Text rendering and the `vclip` CLI session flows

pub mod app;
pub mod commands;
pub mod config;
pub mod demo;
pub mod editor;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod notify;
pub mod poller;
pub mod processing;
pub mod progress_bars;
pub mod render;
pub mod session;

pub use app::{App, Screen, Transition};
pub use config::FrontendConfig;
pub use error::{FrontendError, FrontendResult};
pub use logging::TaskLogger;
pub use poller::{PollHandle, PollOutcome, PollUpdate, StatusPoller};
pub use session::{GenerateOptions, Session, SessionOptions};
