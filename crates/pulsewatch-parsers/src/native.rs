//! Native YAML check output: a single mapping, or a sequence of them.

use std::collections::BTreeMap;

use pulsewatch_range::Range;
use pulsewatch_status::{normalize_status, HealthState, Metric, Observation, StatusToken};
use serde_yaml::Value;

use crate::error::ParseError;
use crate::number::to_number;

/// Parse a native-dialect check's stdout into zero or more observations,
/// keyed by check name.
///
/// `label` identifies the executable in log messages; it plays no role in
/// parsing.
pub fn parse_native(output: &str, label: &str) -> Result<BTreeMap<String, Observation>, ParseError> {
    let parsed: Value = serde_yaml::from_str(output)?;

    let items: Vec<(String, Value)> = match parsed {
        Value::Sequence(items) => {
            let mut usable = Vec::new();
            for item in items {
                let Value::Mapping(map) = &item else {
                    tracing::warn!(check = label, "output item was not a mapping - skipping it");
                    continue;
                };
                if !map.contains_key("status") {
                    tracing::warn!(check = label, "output item has no 'status' key - skipping it");
                    tracing::debug!(check = label, ?item, "dropped item");
                    continue;
                }
                let Some(Value::String(name)) = map.get("check_name") else {
                    tracing::warn!(check = label, "output item has no 'check_name' key - skipping it");
                    continue;
                };
                usable.push((name.clone(), item));
            }
            usable
        }
        Value::Mapping(ref map) => {
            if !map.contains_key("status") {
                tracing::warn!(check = label, "output has no 'status' key - skipping it");
                tracing::debug!(check = label, ?parsed, "dropped output");
                return Err(ParseError::MissingStatus);
            }
            let Some(Value::String(name)) = map.get("check_name") else {
                tracing::warn!(check = label, "output has no 'check_name' key - skipping it");
                return Err(ParseError::MissingStatus);
            };
            vec![(name.clone(), parsed)]
        }
        _ => {
            tracing::warn!(check = label, "output was not a mapping or sequence - skipping it");
            return Err(ParseError::UnexpectedShape);
        }
    };

    let mut result = BTreeMap::new();
    for (check_name, value) in items {
        let Value::Mapping(map) = value else { continue };

        let status = map
            .get("status")
            .and_then(status_token)
            .and_then(|token| normalize_status(&token));

        let (status, message) = match status {
            Some(s) => {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                (s, message)
            }
            None => {
                tracing::warn!(check = %check_name, "status value could not be washed");
                (HealthState::Unknown, "check reported a status that could not be recognized".to_string())
            }
        };

        let mut observation = Observation::new(check_name.clone(), status, message);
        observation.extended_message = map
            .get("extended_message")
            .and_then(Value::as_str)
            .map(str::to_string);

        if let Some(Value::Mapping(metrics)) = map.get("metrics") {
            for (metric_name, details) in metrics {
                let Some(name) = metric_name.as_str() else { continue };
                let Value::Mapping(details) = details else { continue };

                let value = details
                    .get("value")
                    .and_then(value_to_number)
                    .unwrap_or(0.0);
                let mut metric = Metric::new(value);

                let warning_min = details.get("warning_min").and_then(value_to_number);
                let warning_max = details.get("warning_max").and_then(value_to_number);
                if warning_min.is_some() || warning_max.is_some() {
                    metric.warning = Some(Range {
                        min: warning_min,
                        max: warning_max,
                        mode: pulsewatch_range::RangeMode::Outside,
                    });
                }

                let critical_min = details.get("critical_min").and_then(value_to_number);
                let critical_max = details.get("critical_max").and_then(value_to_number);
                if critical_min.is_some() || critical_max.is_some() {
                    metric.critical = Some(Range {
                        min: critical_min,
                        max: critical_max,
                        mode: pulsewatch_range::RangeMode::Outside,
                    });
                }

                observation.metrics.insert(name.to_string(), metric);
            }
        }

        if result.contains_key(&check_name) {
            tracing::warn!(check = %check_name, "duplicate check_name in output, last write wins");
        }
        result.insert(check_name, observation);
    }

    Ok(result)
}

fn status_token(value: &Value) -> Option<StatusToken> {
    match value {
        Value::String(s) => Some(StatusToken::Text(s.clone())),
        Value::Number(n) => n.as_i64().map(StatusToken::Number),
        _ => None,
    }
}

fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => to_number(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_mapping_with_status() {
        let yaml = "check_name: disk\nstatus: OK\nmessage: all good\n";
        let parsed = parse_native(yaml, "disk.sh").unwrap();
        let obs = parsed.get("disk").unwrap();
        assert_eq!(obs.status, HealthState::Ok);
        assert_eq!(obs.message, "all good");
    }

    #[test]
    fn sequence_of_mappings() {
        let yaml = "- check_name: a\n  status: OK\n- check_name: b\n  status: Warning\n";
        let parsed = parse_native(yaml, "multi.sh").unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["a"].status, HealthState::Ok);
        assert_eq!(parsed["b"].status, HealthState::Warning);
    }

    #[test]
    fn missing_status_in_single_mapping_is_dropped() {
        let yaml = "check_name: disk\nmessage: nope\n";
        assert!(parse_native(yaml, "disk.sh").is_err());
    }

    #[test]
    fn malformed_item_in_sequence_is_skipped_not_fatal() {
        let yaml = "- check_name: a\n  status: OK\n- not_a_status: true\n";
        let parsed = parse_native(yaml, "multi.sh").unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn metrics_with_string_numeric_fields_are_coerced() {
        let yaml = "check_name: disk\nstatus: OK\nmetrics:\n  root:\n    value: \"42\"\n    warning_min: \"10\"\n    warning_max: \"90\"\n";
        let parsed = parse_native(yaml, "disk.sh").unwrap();
        let metric = &parsed["disk"].metrics["root"];
        assert_eq!(metric.value, 42.0);
        assert_eq!(metric.warning.unwrap().min, Some(10.0));
    }

    #[test]
    fn unrecognized_status_value_becomes_unknown_with_synthetic_message() {
        let yaml = "check_name: disk\nstatus: sideways\nmessage: raw detail\n";
        let parsed = parse_native(yaml, "disk.sh").unwrap();
        let obs = &parsed["disk"];
        assert_eq!(obs.status, HealthState::Unknown);
        assert_ne!(obs.message, "raw detail");
        assert!(!obs.message.is_empty());
    }

    #[test]
    fn non_mapping_non_sequence_is_unexpected_shape() {
        let yaml = "just a string";
        assert!(matches!(parse_native(yaml, "x"), Err(ParseError::UnexpectedShape)));
    }
}
