use std::time::Duration;

use pulsewatch_status::Snapshot;

use crate::error::ReportError;

/// Where (and how) to submit snapshots to a remote collector, per §4.6:
/// `https` unless TLS is explicitly disabled, with a single timeout that
/// bounds both the connect and read phases of the request.
#[derive(Debug, Clone)]
pub struct ServerTarget {
    pub host: String,
    pub tls: bool,
    pub timeout: Duration,
}

impl ServerTarget {
    #[must_use]
    pub fn new(host: impl Into<String>, tls: bool, timeout: Duration) -> Self {
        Self { host: host.into(), tls, timeout }
    }

    #[must_use]
    pub fn submit_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}/api/submit_state", self.host)
    }
}

/// POST the snapshot as compact JSON to `target`'s submit endpoint.
pub async fn submit_snapshot(
    client: &reqwest::Client,
    target: &ServerTarget,
    snapshot: &Snapshot,
) -> Result<(), ReportError> {
    let url = target.submit_url();
    let body = serde_json::to_vec(snapshot)?;

    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .timeout(target.timeout)
        .body(body)
        .send()
        .await
        .map_err(|source| ReportError::Submit { url: url.clone(), source })?;

    if let Err(source) = response.error_for_status() {
        return Err(ReportError::Submit { url, source });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_url_defaults_to_https() {
        let target = ServerTarget::new("collector.example.com", true, Duration::from_secs(5));
        assert_eq!(target.submit_url(), "https://collector.example.com/api/submit_state");
    }

    #[test]
    fn submit_url_drops_to_http_when_tls_disabled() {
        let target = ServerTarget::new("collector.example.com", false, Duration::from_secs(5));
        assert_eq!(target.submit_url(), "http://collector.example.com/api/submit_state");
    }
}
