//! The long-lived `Agent` value that owns the scheduler queue, the check
//! store, and the process-wide config for the lifetime of the run loop —
//! replacing the source agent's module-level mutable state (spec.md §9).

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;
use pulsewatch_config::{AgentConfig, CheckConfigSet};
use pulsewatch_discovery::{discover_configured_commands, discover_filesystem_checks};
use pulsewatch_engine::{select_action, ChangeEvent, TransitionEngine};
use pulsewatch_reporter::{submit_snapshot, write_snapshot, ServerTarget};
use pulsewatch_runner::{bounded_timeout, CommandSpec, RunnerError, TimeoutRunner};
use pulsewatch_scheduler::{Dialect, ExecutableEntry, Scheduler};
use pulsewatch_status::{HealthState, Observation, Snapshot, SCHEMA_VERSION};

const SNAPSHOT_CADENCE: Duration = Duration::from_secs(50);
const DUE_THRESHOLD: Duration = Duration::from_millis(100);
const EMPTY_QUEUE_SLEEP: Duration = Duration::from_secs(10);
const ACTION_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Agent {
    config: AgentConfig,
    hostname: String,
    check_config: CheckConfigSet,
    scheduler: Scheduler,
    engine: TransitionEngine,
    runner: TimeoutRunner,
    http_client: reqwest::Client,
    last_snapshot: Instant,
}

impl Agent {
    /// Build an agent: run discovery over the configured plugin directories
    /// and config-declared commands, scheduling everything found.
    #[must_use]
    pub fn bootstrap(config: AgentConfig, hostname: String, check_config: CheckConfigSet) -> Self {
        let mut scheduler = Scheduler::new();
        let now = Utc::now();
        let default_interval = Duration::from_secs(config.interval_seconds);

        for entry in discover_filesystem_checks(
            &config.plugin_directory,
            Dialect::Native,
            default_interval,
            now,
        ) {
            scheduler.insert(entry);
        }
        for entry in discover_filesystem_checks(
            &config.checkmk_plugin_directory,
            Dialect::CheckMk,
            default_interval,
            now,
        ) {
            scheduler.insert(entry);
        }
        for entry in discover_filesystem_checks(
            &config.script_checks_directory,
            Dialect::Script,
            default_interval,
            now,
        ) {
            scheduler.insert(entry);
        }
        for entry in discover_configured_commands(&check_config, default_interval, now) {
            scheduler.insert(entry);
        }

        Self {
            config,
            hostname,
            check_config,
            scheduler,
            engine: TransitionEngine::new(),
            runner: TimeoutRunner::new(),
            http_client: reqwest::Client::new(),
            last_snapshot: Instant::now(),
        }
    }

    /// Drive the scheduler until interrupted. Mirrors the source agent's
    /// runner loop (spec.md §4.4): execute when the head is due within
    /// `DUE_THRESHOLD`, otherwise maybe report, then sleep for half the
    /// remaining delay; sleep `EMPTY_QUEUE_SLEEP` when nothing is scheduled.
    pub async fn run(&mut self, data_directory: &Path) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("received interrupt, shutting down");
                    return Ok(());
                }
                () = self.tick(data_directory) => {}
            }
        }
    }

    async fn tick(&mut self, data_directory: &Path) {
        let Some(head) = self.scheduler.peek_head() else {
            tokio::time::sleep(EMPTY_QUEUE_SLEEP).await;
            return;
        };

        let now = Utc::now();
        let delay = (head.next_due - now).to_std().unwrap_or(Duration::ZERO);

        if delay < DUE_THRESHOLD {
            if let Some(entry) = self.scheduler.pop_and_reschedule(now) {
                self.execute(entry, now).await;
            }
            return;
        }

        if self.last_snapshot.elapsed() >= SNAPSHOT_CADENCE {
            self.report(data_directory).await;
            self.last_snapshot = Instant::now();
        }
        tokio::time::sleep(delay / 2).await;
    }

    async fn execute(&mut self, entry: ExecutableEntry, now: chrono::DateTime<Utc>) {
        let check_name = entry_check_name(&entry);
        let cmd = CommandSpec::new(entry.filename.clone()).args(entry.arguments.clone());
        let timeout = bounded_timeout(entry.interval);

        let observations = match self.runner.run_async(&cmd, timeout).await {
            Ok(output) => {
                if !output.stderr.is_empty() {
                    tracing::warn!(check = %check_name, stderr = %output.stderr_string(), "check wrote to stderr");
                }
                self.parse_output(&entry, &check_name, &output)
            }
            Err(RunnerError::Timeout { timeout_seconds }) => {
                tracing::warn!(check = %check_name, timeout_seconds, "check timed out");
                single_unknown(&check_name, "check timed out")
            }
            Err(e) => {
                tracing::warn!(check = %check_name, error = %e, "check failed to execute");
                single_unknown(&check_name, "check could not be executed")
            }
        };

        for (name, observation) in observations {
            self.apply_observation(&name, &observation, now).await;
        }
    }

    fn parse_output(
        &self,
        entry: &ExecutableEntry,
        check_name: &str,
        output: &pulsewatch_runner::ProcessOutput,
    ) -> std::collections::BTreeMap<String, Observation> {
        use pulsewatch_parsers::{parse_checkmk, parse_generic, parse_native, ExitCodeDialect};

        let stdout = output.stdout_string();

        match entry.dialect {
            Dialect::Native => parse_native(&stdout, &entry.filename).unwrap_or_else(|e| {
                tracing::warn!(check = %check_name, error = %e, "native output could not be parsed");
                single_unknown(check_name, "check did not provide a status")
            }),
            Dialect::CheckMk => parse_checkmk(&stdout, &entry.filename),
            Dialect::Nagios => {
                let Some(exit_code) = output.exit_code else {
                    return single_unknown(check_name, "check terminated by signal");
                };
                let observation = parse_generic(&stdout, exit_code, ExitCodeDialect::Nagios, check_name);
                [(check_name.to_string(), observation)].into_iter().collect()
            }
            Dialect::Script | Dialect::Command => {
                let Some(exit_code) = output.exit_code else {
                    return single_unknown(check_name, "check terminated by signal");
                };
                let script_entry = self.check_config.script_config.get(&entry.filename);
                let dialect = ExitCodeDialect::Configured {
                    okay: script_entry.map(|e| e.okay_exit_codes.clone()).unwrap_or_default(),
                    warning: script_entry.map(|e| e.warning_exit_codes.clone()).unwrap_or_default(),
                    critical: script_entry.map(|e| e.critical_exit_codes.clone()).unwrap_or_default(),
                };
                let observation = parse_generic(&stdout, exit_code, dialect, check_name);
                [(check_name.to_string(), observation)].into_iter().collect()
            }
        }
    }

    async fn apply_observation(&mut self, name: &str, observation: &Observation, now: chrono::DateTime<Utc>) {
        let repeat = self.check_config.check_config.get(name).map_or(0, |c| c.repeat);
        if let Some(event) = self.engine.apply(name, observation, repeat, now) {
            self.dispatch_action(name, &event).await;
        }
    }

    async fn dispatch_action(&self, name: &str, event: &ChangeEvent) {
        let Some(entry_config) = self.check_config.check_config.get(name) else { return };
        let Some(action) = select_action(&entry_config.actions, event.to_state) else { return };

        let cmd = CommandSpec::new(action.executable.clone()).args(action.arguments.clone());
        tracing::info!(check = name, to = %event.to_state, executable = %action.executable, "invoking action");

        match self.runner.run_async(&cmd, ACTION_TIMEOUT).await {
            Ok(output) => {
                tracing::info!(
                    check = name,
                    exit_code = output.exit_code,
                    stdout = %output.stdout_string(),
                    stderr = %output.stderr_string(),
                    "action completed"
                );
            }
            Err(e) => tracing::warn!(check = name, error = %e, "action failed to execute"),
        }
    }

    async fn report(&mut self, data_directory: &Path) {
        let snapshot = Snapshot {
            schema_version: SCHEMA_VERSION,
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
            hostname: self.hostname.clone(),
            timestamp: Utc::now(),
            checks: self.engine.store().iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        };

        let data_dir = match camino::Utf8Path::from_path(data_directory) {
            Some(dir) => dir,
            None => {
                tracing::error!(path = %data_directory.display(), "data directory is not valid UTF-8");
                return;
            }
        };
        if let Err(e) = write_snapshot(data_dir, &snapshot) {
            tracing::error!(error = %e, "failed to persist state snapshot");
        }

        if let Some(host) = &self.config.server {
            let target = ServerTarget::new(
                host.clone(),
                self.config.server_tls,
                Duration::from_secs(self.config.server_timeout_seconds),
            );
            if let Err(e) = submit_snapshot(&self.http_client, &target, &snapshot).await {
                tracing::error!(error = %e, "failed to submit state snapshot to remote collector");
            }
        }
    }
}

fn entry_check_name(entry: &ExecutableEntry) -> String {
    entry.check_name.clone().unwrap_or_else(|| base_name(&entry.filename))
}

fn base_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

fn single_unknown(check_name: &str, message: &str) -> std::collections::BTreeMap<String, Observation> {
    [(check_name.to_string(), Observation::new(check_name, HealthState::Unknown, message))]
        .into_iter()
        .collect()
}
