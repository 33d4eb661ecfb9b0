//! Error types for netinv-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running a local command
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Process spawn error (usually the program is not installed)
    #[error("failed to spawn {program}: {reason}")]
    SpawnError {
        /// Program that could not be started
        program: String,
        /// OS error text
        reason: String,
    },

    /// I/O error while collecting output
    #[error("I/O error: {0}")]
    IoError(String),

    /// Command timed out
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },
}
