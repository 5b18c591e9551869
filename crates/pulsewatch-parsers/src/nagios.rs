//! Nagios/generic-script dialect: exit-code status plus the Nagios metric
//! and range grammars shared with CheckMK.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use pulsewatch_range::parse_range;
use pulsewatch_status::{classify_exit_code, ExitCodeClass, HealthState, Metric, Observation};
use regex::Regex;

use crate::number::to_number;

static VALUE_UOM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([\d.]*)(\D*)$").unwrap());
static INLINE_METRIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'[^']+'=\S+|\S+").unwrap());

/// Parse a single Nagios metric string, e.g. `"0.025030s;;;0.000000"` or
/// `"123;80:90;90"`. Returns `None` when the value portion isn't numeric —
/// the source agent silently drops such metrics rather than failing the
/// whole check.
pub fn parse_nagios_metric(metric: &str) -> Option<Metric> {
    let (value_part, rest) = metric.split_once(';').unwrap_or((metric, ""));

    let captures = VALUE_UOM.captures(value_part)?;
    let value_str = captures.get(1).map_or("", |m| m.as_str());
    let uom = captures.get(2).map_or("", |m| m.as_str());

    let value = to_number(value_str)?;
    let mut metric_value = Metric::new(value);
    metric_value.unit = uom.to_string();

    let mut parts = rest.split(';');
    if let Some(item) = parts.next()
        && !item.is_empty()
        && let Ok(range) = parse_range(item)
    {
        metric_value.warning = Some(range);
    }
    if let Some(item) = parts.next()
        && !item.is_empty()
        && let Ok(range) = parse_range(item)
    {
        metric_value.critical = Some(range);
    }
    // min/max (remaining `parts`) are not retained, per the Nagios grammar.

    Some(metric_value)
}

/// Split a Nagios plugin's output line into its message and any inline
/// `|`-delimited metrics.
pub fn parse_nagios_output_string(line: &str) -> (String, BTreeMap<String, Metric>) {
    let Some((message, metrics_string)) = line.split_once('|') else {
        return (line.to_string(), BTreeMap::new());
    };
    let message = message.trim_end_matches(' ').to_string();

    let mut metrics = BTreeMap::new();
    if !metrics_string.is_empty() {
        for token in INLINE_METRIC_TOKEN.find_iter(metrics_string) {
            let token = token.as_str();
            let Some((label, value)) = token.split_once('=') else {
                tracing::debug!(token, "nagios metric token was not parseable");
                continue;
            };
            let label = label.trim_matches('\'');
            if let Some(metric) = parse_nagios_metric(value) {
                metrics.insert(label.to_string(), metric);
            }
        }
    }

    (message, metrics)
}

/// Exit-code interpretation strategy for the generic script dialect.
#[derive(Debug, Clone)]
pub enum ExitCodeDialect {
    /// Classic Nagios plugin codes: `0 -> OK, 1 -> Warning, 2 -> Critical,
    /// else -> Unknown`. Used for the `nagios` executable type.
    Nagios,
    /// Per-check configured exit code lists, with the §4.2 fallback
    /// hierarchy. Used for `script`/`command` executable types.
    Configured { okay: Vec<i32>, warning: Vec<i32>, critical: Vec<i32> },
}

fn classify(exit_code: i32, dialect: &ExitCodeDialect) -> HealthState {
    match dialect {
        ExitCodeDialect::Nagios => match exit_code {
            0 => HealthState::Ok,
            1 => HealthState::Warning,
            2 => HealthState::Critical,
            _ => HealthState::Unknown,
        },
        ExitCodeDialect::Configured { okay, warning, critical } => {
            match classify_exit_code(exit_code, okay, warning, critical) {
                ExitCodeClass::Ok => HealthState::Ok,
                ExitCodeClass::Warning => HealthState::Warning,
                ExitCodeClass::Critical => HealthState::Critical,
                ExitCodeClass::Unknown => HealthState::Unknown,
            }
        }
    }
}

/// Parse the stdout of a generic/Nagios-dialect script, given its exit
/// code and how to interpret it.
pub fn parse_generic(
    output: &str,
    exit_code: i32,
    dialect: ExitCodeDialect,
    check_name: &str,
) -> Observation {
    let status = classify(exit_code, &dialect);

    let mut lines: Vec<&str> = output.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let first_line = lines.first().copied().unwrap_or("");
    let (mut message, metrics) = match dialect {
        ExitCodeDialect::Nagios => parse_nagios_output_string(first_line),
        ExitCodeDialect::Configured { .. } => (first_line.to_string(), BTreeMap::new()),
    };
    if message.is_empty() {
        message = "(no output)".to_string();
    }

    let mut observation = Observation::new(check_name, status, message);
    observation.metrics = metrics;
    if lines.len() > 1 {
        observation.extended_message = Some(lines.join("\n"));
    }
    observation
}
