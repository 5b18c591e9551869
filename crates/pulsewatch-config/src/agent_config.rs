use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::args::AgentArgs;
use crate::error::ConfigError;

/// The subset of agent settings that can come from a YAML config file — the
/// lowest-priority layer, below CLI flags and their environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub check_config_path: Option<PathBuf>,
    pub interval: Option<u64>,
    pub log_level: Option<String>,
    pub data_directory: Option<PathBuf>,
    pub node_name: Option<String>,
    pub plugin_directory: Option<PathBuf>,
    pub checkmk_plugin_directory: Option<PathBuf>,
    pub script_checks_directory: Option<PathBuf>,
    pub server: Option<String>,
    pub server_no_tls: Option<bool>,
    pub server_timeout: Option<u64>,
}

/// Fully resolved agent configuration: every field has a concrete value,
/// following the precedence CLI > environment > config file > default.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub check_config_path: PathBuf,
    pub interval_seconds: u64,
    pub log_level: String,
    pub data_directory: PathBuf,
    pub node_name: Option<String>,
    pub plugin_directory: PathBuf,
    pub checkmk_plugin_directory: PathBuf,
    pub script_checks_directory: PathBuf,
    pub server: Option<String>,
    pub server_tls: bool,
    pub server_timeout_seconds: u64,
}

impl AgentConfig {
    /// Resolve CLI/env arguments against an optional config file and the
    /// built-in defaults.
    pub fn resolve(args: &AgentArgs) -> Result<Self, ConfigError> {
        let file = match &args.agent_config_path {
            Some(path) => load_file_config(path)?,
            None => FileConfig::default(),
        };

        let log_level = args
            .log_level
            .clone()
            .or(file.log_level)
            .unwrap_or_else(|| "info".to_string());
        if !["debug", "info", "warning", "error", "critical"].contains(&log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(log_level));
        }

        Ok(Self {
            check_config_path: args
                .check_config_path
                .clone()
                .or(file.check_config_path)
                .unwrap_or_else(|| PathBuf::from("/etc/pulsewatch.d")),
            interval_seconds: args.interval.or(file.interval).unwrap_or(60),
            log_level,
            data_directory: args
                .data_directory
                .clone()
                .or(file.data_directory)
                .unwrap_or_else(|| PathBuf::from("/var/lib/pulsewatch")),
            node_name: args.node_name.clone().or(file.node_name),
            plugin_directory: args
                .plugin_directory
                .clone()
                .or(file.plugin_directory)
                .unwrap_or_else(|| PathBuf::from("/usr/lib/pulsewatch/plugins")),
            checkmk_plugin_directory: args
                .checkmk_plugin_directory
                .clone()
                .or(file.checkmk_plugin_directory)
                .unwrap_or_else(|| PathBuf::from("/usr/lib/check_mk_agent/local")),
            script_checks_directory: args
                .script_checks_directory
                .clone()
                .or(file.script_checks_directory)
                .unwrap_or_else(|| PathBuf::from("/usr/lib/pulsewatch/scripts")),
            server: args.server.clone().or(file.server),
            server_tls: if args.server_no_tls { false } else { !file.server_no_tls.unwrap_or(false) },
            server_timeout_seconds: args.server_timeout.or(file.server_timeout).unwrap_or(30),
        })
    }
}

/// Dispatches on the file extension: `.toml` is parsed as TOML, anything
/// else (including no extension) as YAML.
fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&contents).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::ParseYaml {
            path: path.to_path_buf(),
            source,
        })
    }
}
