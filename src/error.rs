//! Startup error taxonomy.
//!
//! Init failures are the only recoverable errors surfaced to the caller;
//! in-frame graphics errors are handled at the frame loop and audio errors
//! stay on the audio thread.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("missing asset: {0}")]
    MissingAsset(PathBuf),
}
