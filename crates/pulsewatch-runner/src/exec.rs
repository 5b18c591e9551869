//! Async [`ProcessRunner`] implementation with enforced per-invocation timeouts.
//!
//! Every check or action is run under `tokio::time::timeout`, so a plugin that
//! hangs never stalls the scheduler beyond the bound passed in. Callers
//! typically pass `min(check.interval, 30s)`.

use std::time::Duration;

use tokio::process::Child;

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;
use crate::process::{ProcessOutput, ProcessRunner};

/// Runs commands via the Tokio process API, enforcing a wall-clock timeout
/// per invocation. On timeout the child is killed rather than left to
/// become a zombie.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutRunner;

impl TimeoutRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Execute `cmd` asynchronously, killing it if it exceeds `timeout`.
    pub async fn run_async(
        &self,
        cmd: &CommandSpec,
        timeout: Duration,
    ) -> Result<ProcessOutput, RunnerError> {
        let mut child: Child = cmd
            .to_tokio_command()
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| RunnerError::SpawnFailed { reason: e.to_string() })?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ProcessOutput::new(
                output.stdout,
                output.stderr,
                output.status.code(),
                false,
            )),
            Ok(Err(e)) => Err(RunnerError::NativeExecutionFailed { reason: e.to_string() }),
            Err(_) => Err(RunnerError::Timeout { timeout_seconds: timeout.as_secs() }),
        }
    }
}

/// Blocking [`ProcessRunner`] facade over [`TimeoutRunner::run_async`], for
/// call sites that have not (yet) gone async. Spawns a throwaway
/// current-thread runtime per call; the scheduler itself should prefer
/// `run_async` directly.
impl ProcessRunner for TimeoutRunner {
    fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RunnerError::SpawnFailed { reason: e.to_string() })?;
        rt.block_on(self.run_async(cmd, timeout))
    }
}

/// Bound a configured interval to the hard cap on subprocess execution time.
#[must_use]
pub fn bounded_timeout(interval: Duration) -> Duration {
    interval.min(Duration::from_secs(30))
}
