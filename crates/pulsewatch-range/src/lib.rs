//! Nagios-style threshold range grammar.
//!
//! A range token has the shape `[@][min][:[max]]`, where `min`/`max` are
//! signed decimals or `~` (negative infinity). See
//! <https://nagios-plugins.org/doc/guidelines.html#THRESHOLDFORMAT>.
//!
//! This crate only knows about numbers and ranges — it has no notion of
//! health states. Callers combine the boolean "did this trip" result from
//! [`Range::trips`] with their own severity ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a range alerts when the value falls inside it or outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMode {
    /// Alerts when the value IS within `[min, max)`. Default mode.
    Outside,
    /// Alerts when the value falls OUTSIDE `[min, max]` (flipped by a leading `@`).
    Inside,
}

/// A parsed threshold range: optional bounds plus a mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mode: RangeMode,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range minimum is not a number: {0}")]
    BadMin(String),
    #[error("range maximum is not a number: {0}")]
    BadMax(String),
    #[error("range maximum {max} is not greater than minimum {min}")]
    MaxNotGreaterThanMin { min: String, max: String },
}

/// Parse a Nagios/CheckMK threshold range token, e.g. `"10:20"`, `"@10:20"`,
/// `"~:20"`, `"10"`.
///
/// Rules (see `spec.md` §4.1):
/// - A leading `@` flips the mode to [`RangeMode::Inside`].
/// - No colon: the whole token is `min`; `max` is left unset.
/// - Empty `min` before the colon defaults to `0`; `~` means unset (−∞).
/// - Empty `max` after the colon is left unset.
/// - Fails when both bounds are set and `max <= min`.
pub fn parse_range(token: &str) -> Result<Range, RangeError> {
    let (mode, rest) = match token.strip_prefix('@') {
        Some(rest) => (RangeMode::Inside, rest),
        None => (RangeMode::Outside, token),
    };

    let (min, max) = if let Some((min_str, max_str)) = rest.split_once(':') {
        let min = match min_str {
            "~" => None,
            "" => Some(0.0),
            s => Some(parse_number(s).ok_or_else(|| RangeError::BadMin(s.to_string()))?),
        };
        let max = match max_str {
            "" => None,
            s => Some(parse_number(s).ok_or_else(|| RangeError::BadMax(s.to_string()))?),
        };
        (min, max)
    } else {
        let min = parse_number(rest).ok_or_else(|| RangeError::BadMin(rest.to_string()))?;
        (Some(min), None)
    };

    if let (Some(min_v), Some(max_v)) = (min, max)
        && max_v <= min_v
    {
        return Err(RangeError::MaxNotGreaterThanMin {
            min: min_v.to_string(),
            max: max_v.to_string(),
        });
    }

    Ok(Range { min, max, mode })
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}

impl Range {
    /// Does `value` fall in this range's alert zone?
    ///
    /// `Outside` mode trips on the half-open interval `[min, max)`:
    /// `(min set ∧ value >= min) ∧ (max unset ∨ value < max)`.
    /// `Inside` mode trips when the value escapes `[min, max]` on either
    /// side.
    #[must_use]
    pub fn trips(&self, value: f64) -> bool {
        match self.mode {
            RangeMode::Outside => match (self.min, self.max) {
                (Some(min), Some(max)) => value >= min && value < max,
                (Some(min), None) => value >= min,
                (None, _) => false,
            },
            RangeMode::Inside => {
                let below = self.min.is_some_and(|min| value < min);
                let above = self.max.is_some_and(|max| value > max);
                below || above
            }
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            RangeMode::Outside => "",
            RangeMode::Inside => "@",
        };
        let min = self.min.map_or_else(|| "~".to_string(), |m| m.to_string());
        let max = self.max.map_or_else(String::new, |m| m.to_string());
        write!(f, "{mode}{min}:{max}")
    }
}

/// The three states a numeric metric can drive on its own. Metrics never
/// produce `Unknown` — that's a property of the check's own status, not of
/// threshold evaluation (`spec.md` §4.5 step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricAlert {
    Ok,
    Warning,
    Critical,
}

/// Evaluate a metric's value against its warning and critical ranges,
/// critical first, matching `check_metric_in_range` in the source agent.
#[must_use]
pub fn check_metric_in_range(
    value: f64,
    warning: Option<&Range>,
    critical: Option<&Range>,
) -> MetricAlert {
    if critical.is_some_and(|r| r.trips(value)) {
        return MetricAlert::Critical;
    }
    if warning.is_some_and(|r| r.trips(value)) {
        return MetricAlert::Warning;
    }
    MetricAlert::Ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn s1_range_parse_examples() {
        assert_eq!(
            parse_range("10:20").unwrap(),
            Range { min: Some(10.0), max: Some(20.0), mode: RangeMode::Outside }
        );
        assert_eq!(
            parse_range("@10:20").unwrap(),
            Range { min: Some(10.0), max: Some(20.0), mode: RangeMode::Inside }
        );
        assert_eq!(
            parse_range("~:20").unwrap(),
            Range { min: None, max: Some(20.0), mode: RangeMode::Outside }
        );
        assert!(parse_range("10:-10").is_err());
    }

    #[test]
    fn bare_token_is_min_alone() {
        assert_eq!(
            parse_range("10").unwrap(),
            Range { min: Some(10.0), max: None, mode: RangeMode::Outside }
        );
    }

    #[test]
    fn negative_bounds_round_trip() {
        assert_eq!(
            parse_range("-20:-10").unwrap(),
            Range { min: Some(-20.0), max: Some(-10.0), mode: RangeMode::Outside }
        );
    }

    #[test]
    fn empty_min_before_colon_defaults_to_zero() {
        assert_eq!(
            parse_range(":20").unwrap(),
            Range { min: Some(0.0), max: Some(20.0), mode: RangeMode::Outside }
        );
    }

    #[test]
    fn non_numeric_bound_is_bad_range() {
        assert!(matches!(parse_range("abc:20"), Err(RangeError::BadMin(_))));
        assert!(matches!(parse_range("10:xyz"), Err(RangeError::BadMax(_))));
    }

    #[test]
    fn s2_metric_evaluation_examples() {
        let warn_80 = parse_range("80").unwrap();
        assert_eq!(
            check_metric_in_range(80.0, Some(&warn_80), None),
            MetricAlert::Warning
        );
        assert_eq!(
            check_metric_in_range(20.0, Some(&warn_80), None),
            MetricAlert::Ok
        );

        let warn_20_30 = parse_range("20:30").unwrap();
        assert_eq!(
            check_metric_in_range(40.0, Some(&warn_20_30), None),
            MetricAlert::Ok
        );
    }

    #[test]
    fn critical_takes_precedence_over_warning() {
        let warning = parse_range("50").unwrap();
        let critical = parse_range("80").unwrap();
        assert_eq!(
            check_metric_in_range(90.0, Some(&warning), Some(&critical)),
            MetricAlert::Critical
        );
    }

    proptest! {
        /// Law 2: for any legal range token, the parsed triple's evaluation
        /// is self-consistent with the half-open / inside-out semantics
        /// that `parse_range` documents.
        #[test]
        fn prop_range_round_trip(min in -1000i32..1000, span in 1i32..1000) {
            let max = min + span;
            let token = format!("{min}:{max}");
            let range = parse_range(&token).unwrap();
            prop_assert_eq!(range.min, Some(min as f64));
            prop_assert_eq!(range.max, Some(max as f64));
            prop_assert_eq!(range.mode, RangeMode::Outside);

            // Outside mode: half-open [min, max) trips.
            prop_assert!(range.trips(min as f64));
            prop_assert!(!range.trips(max as f64));
            prop_assert!(!range.trips((min - 1) as f64));
        }

        #[test]
        fn prop_inside_mode_is_complement_of_closed_interval(min in -1000i32..1000, span in 1i32..1000) {
            let max = min + span;
            let token = format!("@{min}:{max}");
            let range = parse_range(&token).unwrap();
            prop_assert!(!range.trips(min as f64));
            prop_assert!(!range.trips(max as f64));
            prop_assert!(range.trips((min - 1) as f64));
            prop_assert!(range.trips((max + 1) as f64));
        }
    }
}
