//! Error types for the runner crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("failed to spawn process: {reason}")]
    SpawnFailed { reason: String },

    #[error("native execution failed: {reason}")]
    NativeExecutionFailed { reason: String },

    #[error("execution timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}
