//! Client for the clip generation service.
//!
//! The service owns all video processing. This crate wraps its HTTP
//! contract: submitting a source URL, polling task status, and downloading
//! rendered clips.

pub mod client;
pub mod error;

pub use client::{ClientConfig, ClipClient};
pub use error::{ClientError, ClientResult};
