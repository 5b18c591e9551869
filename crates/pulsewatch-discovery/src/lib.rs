//! Discovery (C7): turn plugin directories and config-declared commands into
//! [`ExecutableEntry`] records the scheduler can run.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pulsewatch_config::CheckConfigSet;
use pulsewatch_scheduler::{Dialect, ExecutableEntry};
use rand::Rng;

const BACKUP_SUFFIXES: &[&str] = &[".bak", ".rpmsave", ".old", ".orig"];

fn jitter() -> Duration {
    Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..1.0))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.metadata().is_ok_and(|m| m.is_file())
}

fn is_backup_name(name: &str) -> bool {
    name.starts_with('.') || BACKUP_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Enumerate one plugin directory: immediate executable children become
/// entries at `default_interval`; immediate subdirectories named with a
/// non-negative integer become entries at that many seconds (recursion is
/// exactly one level deep, per §4.7).
///
/// Filesystem-discovered entries start due "now" (no jitter), so the first
/// sweep populates state immediately.
#[must_use]
pub fn discover_filesystem_checks(
    dir: &Path,
    dialect: Dialect,
    default_interval: Duration,
    now: DateTime<Utc>,
) -> Vec<ExecutableEntry> {
    scan_directory(dir, dialect, default_interval, now, false)
}

fn scan_directory(
    dir: &Path,
    dialect: Dialect,
    interval: Duration,
    now: DateTime<Utc>,
    is_timed_subdir: bool,
) -> Vec<ExecutableEntry> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        tracing::debug!(path = %dir.display(), "plugin directory does not exist");
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut subdirs = Vec::new();

    for item in read_dir.flatten() {
        let path = item.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };

        if path.is_dir() {
            if !is_timed_subdir && name.chars().all(|c| c.is_ascii_digit()) && !name.is_empty() {
                subdirs.push((path, name.parse::<u64>().unwrap_or(0)));
            }
            continue;
        }

        if is_backup_name(name) || !is_executable(&path) {
            continue;
        }

        entries.push(ExecutableEntry {
            filename: path.to_string_lossy().into_owned(),
            arguments: Vec::new(),
            interval,
            dialect,
            check_name: None,
            next_due: now,
        });
    }

    for (path, seconds) in subdirs {
        entries.extend(scan_directory(&path, dialect, Duration::from_secs(seconds), now, true));
    }

    entries
}

/// Enroll every executable `command_config`/`nagios_config` entry, honoring
/// per-entry arguments, interval, and check-name override (§4.7). These get
/// uniform `[0, 1)` second jitter on their first schedule.
#[must_use]
pub fn discover_configured_commands(
    check_config: &CheckConfigSet,
    default_interval: Duration,
    now: DateTime<Utc>,
) -> Vec<ExecutableEntry> {
    let mut entries = Vec::new();

    for (filename, entry) in &check_config.command_config {
        entries.push(configured_entry(filename, entry, Dialect::Command, default_interval, now));
    }
    for (filename, entry) in &check_config.nagios_config {
        entries.push(configured_entry(filename, entry, Dialect::Nagios, default_interval, now));
    }

    entries
}

fn configured_entry(
    filename: &str,
    entry: &pulsewatch_config::CommandEntry,
    dialect: Dialect,
    default_interval: Duration,
    now: DateTime<Utc>,
) -> ExecutableEntry {
    let path = Path::new(filename);
    if !is_executable(path) {
        tracing::warn!(filename, "configured command is not executable, scheduling anyway");
    }
    ExecutableEntry {
        filename: filename.to_string(),
        arguments: entry.arguments.clone(),
        interval: entry.interval.map_or(default_interval, Duration::from_secs),
        dialect,
        check_name: entry.check_name.clone(),
        next_due: now + chrono::Duration::from_std(jitter()).unwrap_or(chrono::Duration::zero()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn make_executable(path: &Path) {
        std::fs::write(path, "#!/bin/sh\necho ok\n").unwrap();
        let mut perms = std::fs::metadata(path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).unwrap();
    }

    #[test]
    fn discovers_executable_files_not_hidden_or_backups() {
        let dir = tempfile::tempdir().unwrap();
        make_executable(&dir.path().join("check-disk"));
        make_executable(&dir.path().join(".hidden"));
        make_executable(&dir.path().join("check-disk.bak"));
        std::fs::write(dir.path().join("not-executable"), "plain").unwrap();

        let entries = discover_filesystem_checks(
            dir.path(),
            Dialect::Native,
            Duration::from_secs(60),
            Utc::now(),
        );
        assert_eq!(entries.len(), 1);
        assert!(entries[0].filename.ends_with("check-disk"));
    }

    #[test]
    fn numeric_subdirectory_overrides_interval_one_level_deep() {
        let dir = tempfile::tempdir().unwrap();
        let timed = dir.path().join("300");
        std::fs::create_dir(&timed).unwrap();
        make_executable(&timed.join("slow-check"));

        let entries = discover_filesystem_checks(
            dir.path(),
            Dialect::Script,
            Duration::from_secs(60),
            Utc::now(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].interval, Duration::from_secs(300));
    }

    #[test]
    fn missing_directory_yields_no_entries() {
        let entries = discover_filesystem_checks(
            Path::new("/nonexistent/for/test"),
            Dialect::Native,
            Duration::from_secs(60),
            Utc::now(),
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn configured_commands_get_jitter_not_immediate() {
        let mut config = CheckConfigSet::default();
        config.command_config.insert(
            "/usr/local/bin/custom-check".to_string(),
            pulsewatch_config::CommandEntry::default(),
        );
        let now = Utc::now();
        let entries = discover_configured_commands(&config, Duration::from_secs(60), now);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].next_due >= now);
        assert!(entries[0].next_due < now + chrono::Duration::seconds(1));
    }
}
