use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("could not parse config file {path} as YAML: {source}")]
    ParseYaml { path: PathBuf, source: serde_yaml::Error },

    #[error("could not parse config file {path} as TOML: {source}")]
    ParseToml { path: PathBuf, source: toml::de::Error },

    #[error("log level {0:?} is not one of debug/info/warning/error/critical")]
    InvalidLogLevel(String),
}
