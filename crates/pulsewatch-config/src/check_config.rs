use std::collections::BTreeMap;
use std::path::Path;

use pulsewatch_engine::ActionSet;
use serde::Deserialize;

/// Per-check-name overrides: flapping suppression and action hooks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckEntryConfig {
    pub repeat: u32,
    #[serde(flatten)]
    pub actions: ActionSet,
}

/// A `command_config`/`nagios_config` entry: a filename-keyed executable
/// enrollment, independent of filesystem discovery.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommandEntry {
    pub arguments: Vec<String>,
    pub interval: Option<u64>,
    pub check_name: Option<String>,
}

/// A `script_config` entry: per-script exit-code interpretation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScriptEntry {
    pub okay_exit_codes: Vec<i32>,
    pub warning_exit_codes: Vec<i32>,
    pub critical_exit_codes: Vec<i32>,
    pub check_name: Option<String>,
}

/// The merged check-configuration sections, assembled from every YAML file
/// in the check-config directory (§4.7/§4.9). Later files override earlier
/// ones key-by-key; files are read in directory listing order.
#[derive(Debug, Clone, Default)]
pub struct CheckConfigSet {
    pub check_config: BTreeMap<String, CheckEntryConfig>,
    pub script_config: BTreeMap<String, ScriptEntry>,
    pub command_config: BTreeMap<String, CommandEntry>,
    pub nagios_config: BTreeMap<String, CommandEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFile {
    check_config: BTreeMap<String, CheckEntryConfig>,
    script_config: BTreeMap<String, ScriptEntry>,
    command_config: BTreeMap<String, CommandEntry>,
    nagios_config: BTreeMap<String, CommandEntry>,
}

/// Load and merge every YAML file directly inside `dir`. A directory that
/// doesn't exist yields an empty (not erroring) config set — check configs
/// are optional. Malformed or unreadable files are logged and skipped.
#[must_use]
pub fn load_check_configs(dir: &Path) -> CheckConfigSet {
    let mut merged = CheckConfigSet::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            tracing::debug!(path = %dir.display(), "check config path is not a directory");
            return merged;
        }
    };

    let mut paths: Vec<_> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();

    for path in paths {
        if !path.is_file() {
            continue;
        }
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read check config");
                continue;
            }
        };
        let parsed: RawFile = match serde_yaml::from_str(&contents) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not parse check config");
                continue;
            }
        };

        merged.check_config.extend(parsed.check_config);
        merged.script_config.extend(parsed.script_config);
        merged.command_config.extend(parsed.command_config);
        merged.nagios_config.extend(parsed.nagios_config);
    }

    merged
}
