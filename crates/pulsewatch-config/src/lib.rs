//! Agent configuration intake (C8): CLI/env arguments layered over an
//! optional YAML config file, plus check-config directory loading.

mod agent_config;
mod args;
mod check_config;
mod error;

pub use agent_config::{AgentConfig, FileConfig};
pub use args::AgentArgs;
pub use check_config::{load_check_configs, CheckConfigSet, CheckEntryConfig, CommandEntry, ScriptEntry};
pub use error::ConfigError;
