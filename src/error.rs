use std::path::PathBuf;

use thiserror::Error;

/// Top-level agent error, covering only the cases that justify a hard exit.
///
/// Per-check failures (parse errors, plugin I/O, a single bad config file, a
/// failed report) are recovered locally by the scheduler loop and logged —
/// they never reach `main`. This type exists for the handful of startup
/// failures that should prevent the agent from running at all.
///
/// | Exit code | Case |
/// |-----------|------|
/// | 2 | Config file present but unreadable/unparseable |
/// | 3 | Data directory unusable (can't create/write) |
/// | 4 | Another instance already holds the lock |
/// | 1 | Anything else |
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("configuration error: {0}")]
    Config(#[from] pulsewatch_config::ConfigError),

    #[error("data directory {path} is not usable")]
    DataDirectory { path: PathBuf, #[source] source: std::io::Error },

    #[error("{0}")]
    Lock(#[from] pulsewatch_lock::LockError),
}

impl AgentError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::DataDirectory { .. } => 3,
            Self::Lock(_) => 4,
        }
    }
}
