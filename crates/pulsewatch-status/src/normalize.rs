use crate::state::HealthState;

/// A raw status token as it arrives from a plugin, before washing. Native
/// and CheckMK output can hand us either a word or a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusToken {
    Text(String),
    Number(i64),
}

impl From<&str> for StatusToken {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StatusToken {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for StatusToken {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Wash a raw status token into a canonical [`HealthState`], matching
/// `state_wash` in the source agent: case- and whitespace-insensitive, and
/// tolerant of either the word or the Nagios exit-code number.
///
/// Returns `None` when the token doesn't map to anything recognised — the
/// caller decides what an unwashable status means (usually `Unknown` plus a
/// logged warning).
#[must_use]
pub fn normalize_status(token: &StatusToken) -> Option<HealthState> {
    match token {
        StatusToken::Text(s) => {
            let s = s.trim().to_ascii_lowercase();
            match s.as_str() {
                "ok" | "okay" | "0" => Some(HealthState::Ok),
                "warning" | "1" => Some(HealthState::Warning),
                "critical" | "2" => Some(HealthState::Critical),
                "unknown" | "3" => Some(HealthState::Unknown),
                _ => None,
            }
        }
        StatusToken::Number(0) => Some(HealthState::Ok),
        StatusToken::Number(1) => Some(HealthState::Warning),
        StatusToken::Number(2) => Some(HealthState::Critical),
        StatusToken::Number(3) => Some(HealthState::Unknown),
        StatusToken::Number(_) => None,
    }
}

/// The result of classifying a script's exit code against its configured
/// okay/warning/critical code sets. Unlike [`HealthState`], this has no
/// notion of "sticky" semantics — it's a one-shot classification of a single
/// invocation's exit code (`work_out_exit_code_status` in the source agent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCodeClass {
    Ok,
    Warning,
    Critical,
    Unknown,
}

/// Classify a process exit code using the Nagios convention, falling back
/// through configured code sets before guessing:
///
/// 1. An exact match in `okays`/`warnings`/`criticals` wins.
/// 2. Otherwise exit code `0` is `Ok`.
/// 3. Otherwise, if any non-zero code sets were configured at all, the
///    unmatched code is `Unknown` (it's "weird", not necessarily bad).
/// 4. Otherwise (nothing configured beyond the default), any non-zero code
///    is `Critical`.
#[must_use]
pub fn classify_exit_code(
    exit_code: i32,
    okays: &[i32],
    warnings: &[i32],
    criticals: &[i32],
) -> ExitCodeClass {
    if okays.contains(&exit_code) {
        return ExitCodeClass::Ok;
    }
    if warnings.contains(&exit_code) {
        return ExitCodeClass::Warning;
    }
    if criticals.contains(&exit_code) {
        return ExitCodeClass::Critical;
    }
    if exit_code == 0 {
        return ExitCodeClass::Ok;
    }
    if !warnings.is_empty() || !criticals.is_empty() {
        return ExitCodeClass::Unknown;
    }
    ExitCodeClass::Critical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn washes_words_numbers_and_case() {
        assert_eq!(normalize_status(&"OK".into()), Some(HealthState::Ok));
        assert_eq!(normalize_status(&"  okay ".into()), Some(HealthState::Ok));
        assert_eq!(normalize_status(&"CRITICAL".into()), Some(HealthState::Critical));
        assert_eq!(normalize_status(&"2".into()), Some(HealthState::Critical));
        assert_eq!(normalize_status(&StatusToken::Number(1)), Some(HealthState::Warning));
    }

    #[test]
    fn unwashable_token_is_none() {
        assert_eq!(normalize_status(&"sideways".into()), None);
        assert_eq!(normalize_status(&StatusToken::Number(99)), None);
    }

    #[test]
    fn exit_code_exact_match_wins() {
        assert_eq!(classify_exit_code(5, &[5], &[], &[]), ExitCodeClass::Ok);
    }

    #[test]
    fn exit_code_zero_defaults_to_ok() {
        assert_eq!(classify_exit_code(0, &[], &[], &[]), ExitCodeClass::Ok);
    }

    #[test]
    fn exit_code_unmatched_with_configured_thresholds_is_unknown() {
        assert_eq!(classify_exit_code(9, &[], &[1], &[2]), ExitCodeClass::Unknown);
    }

    #[test]
    fn exit_code_unmatched_with_nothing_configured_is_critical() {
        assert_eq!(classify_exit_code(9, &[], &[], &[]), ExitCodeClass::Critical);
    }
}
