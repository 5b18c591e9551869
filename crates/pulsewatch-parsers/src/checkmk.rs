//! CheckMK local-check line format:
//! `status check_name metrics_or_dash message text...`

use std::collections::BTreeMap;
use std::sync::LazyLock;

use pulsewatch_status::{normalize_status, HealthState, Observation, StatusToken};
use regex::Regex;

use crate::nagios::parse_nagios_metric;

static LINE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[^"\s]\S*|".+?""#).unwrap());

/// Parse CheckMK local-check output into observations keyed by check name.
/// A line too short to have a check name and metrics field is skipped
/// entirely; an unrecognised status code still yields an `Unknown`
/// observation with a synthetic message, per spec.md §4.8 — the dialect
/// never silently drops a check it could otherwise name.
pub fn parse_checkmk(output: &str, label: &str) -> BTreeMap<String, Observation> {
    let mut result = BTreeMap::new();

    for line in output.split('\n') {
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = LINE_TOKEN.find_iter(line).map(|m| m.as_str()).collect();
        if parts.len() < 3 {
            tracing::debug!(check = label, line, "skipping malformed checkmk line");
            continue;
        }

        let check_name = parts[1].trim_matches('"').to_string();
        let metrics_string = parts[2];

        let status = parts[0]
            .parse::<i64>()
            .ok()
            .and_then(|code| normalize_status(&StatusToken::Number(code)));
        let (status, synthetic_message) = match status {
            Some(status) => (status, None),
            None => {
                tracing::debug!(check = label, line, "unrecognised checkmk status - reporting Unknown");
                (HealthState::Unknown, Some("check reported a status that could not be recognized"))
            }
        };

        let mut message = match synthetic_message {
            Some(synthetic) => synthetic.to_string(),
            None => {
                if parts.len() > 3 {
                    parts[3..].join(" ")
                } else {
                    String::new()
                }
            }
        };

        let mut metrics = BTreeMap::new();
        if metrics_string != "-" {
            for item in metrics_string.split('|') {
                let Some((key, value)) = item.split_once('=') else {
                    tracing::debug!(check = label, item, "could not parse checkmk metric");
                    continue;
                };
                if let Some(metric) = parse_nagios_metric(value) {
                    metrics.insert(key.to_string(), metric);
                }
            }
        }

        let mut extended_message = None;
        if let Some((head, tail)) = message.split_once("\\n") {
            extended_message = Some(tail.to_string());
            message = head.to_string();
        }

        let mut observation = Observation::new(check_name.clone(), status, message);
        observation.metrics = metrics;
        observation.extended_message = extended_message;
        result.insert(check_name, observation);
    }

    result
}
