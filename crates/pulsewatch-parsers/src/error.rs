use thiserror::Error;

/// Parse failures severe enough to drop an entire invocation's output.
/// Individual malformed lines/items within an otherwise-usable payload are
/// logged and skipped instead — they never reach this type.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not parse YAML output: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("output was neither a mapping nor a sequence of mappings")]
    UnexpectedShape,

    #[error("output did not contain a 'status' field")]
    MissingStatus,
}
