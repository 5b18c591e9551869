use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize snapshot")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write snapshot to {path}")]
    Write { path: Utf8PathBuf, #[source] source: anyhow::Error },

    #[error("failed to submit snapshot to {url}")]
    Submit { url: String, #[source] source: reqwest::Error },
}
