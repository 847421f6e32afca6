//! Engine-level error types
//!
//! Session-level failures live here. Loop-level failures are
//! [`crate::agent::LoopError`] (they carry the partial session), and
//! tool-level failures are never raised at all: they are recorded in
//! the history as [`crate::session::ToolOutcome`] values and handed
//! back to the model.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by session inspection and derivation
#[derive(Debug, Error)]
pub enum SessionError {
    /// `last_reply` was queried before any model reply was recorded
    #[error("no model reply in session history yet")]
    NoReplyYet,

    /// A prompt file could not be read
    #[error("prompt resource unavailable: {path}")]
    ResourceUnavailable {
        /// Path the caller supplied
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),
}
