use std::path::PathBuf;

use clap::Parser;

/// Command-line and environment arguments for the pulsewatch agent.
///
/// Every field is optional here: a value left unset by both the CLI and its
/// environment variable falls through to the agent config file, then to a
/// hardcoded default, via [`crate::AgentConfig::resolve`].
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pulsewatch-agent")]
#[command(about = "Host monitoring agent: scheduled check execution, state tracking, and reporting")]
#[command(version)]
pub struct AgentArgs {
    /// Path to the agent configuration file
    #[arg(short = 'c', long, env = "PULSEWATCH_CONFIG_PATH")]
    pub agent_config_path: Option<PathBuf>,

    /// Path to a directory of per-check configs
    #[arg(short = 'e', long, env = "PULSEWATCH_CHECK_CONFIG_PATH")]
    pub check_config_path: Option<PathBuf>,

    /// Default execution interval, in seconds
    #[arg(short = 'i', long, env = "PULSEWATCH_INTERVAL")]
    pub interval: Option<u64>,

    /// Log verbosity level
    #[arg(short = 'l', long, env = "PULSEWATCH_LOG_LEVEL", value_parser = ["debug", "info", "warning", "error", "critical"])]
    pub log_level: Option<String>,

    /// Directory to write data files (state.json) into
    #[arg(short = 'd', long, env = "PULSEWATCH_DATA_DIRECTORY")]
    pub data_directory: Option<PathBuf>,

    /// Override the detected hostname
    #[arg(short = 'n', long, env = "PULSEWATCH_HOSTNAME")]
    pub node_name: Option<String>,

    /// Directory to look for native-dialect check plugins
    #[arg(long, env = "PULSEWATCH_PLUGIN_DIRECTORY")]
    pub plugin_directory: Option<PathBuf>,

    /// Directory to look for CheckMK local-check plugins
    #[arg(long, env = "PULSEWATCH_CHECKMK_PLUGIN_DIRECTORY")]
    pub checkmk_plugin_directory: Option<PathBuf>,

    /// Directory to look for plain script checks
    #[arg(long, env = "PULSEWATCH_SCRIPT_CHECKS_DIRECTORY")]
    pub script_checks_directory: Option<PathBuf>,

    /// The collector to which the agent POSTs state snapshots
    #[arg(short = 'm', long, env = "PULSEWATCH_SERVER")]
    pub server: Option<String>,

    /// Disable TLS when talking to the collector
    #[arg(long, env = "PULSEWATCH_SERVER_NO_TLS")]
    pub server_no_tls: bool,

    /// Connect/read timeout, in seconds, for the collector POST
    #[arg(long, env = "PULSEWATCH_SERVER_TIMEOUT")]
    pub server_timeout: Option<u64>,
}
