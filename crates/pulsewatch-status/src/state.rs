use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The four health states a check (or the agent as a whole) can be in.
///
/// `HealthState` carries a total order, `Ok < Warning < Critical < Unknown`,
/// via its derived [`Ord`]. That order is what [`HealthState::worst`] uses,
/// and it is intentionally the *generic* severity comparison — it is not the
/// same thing as the transition engine's step-by-step escalation, which
/// treats `Unknown` as sticky rather than as "worse than everything". See
/// `pulsewatch-engine` for that asymmetric rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthState {
    #[serde(rename = "OK")]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl HealthState {
    /// Commutative, associative "worse of the two" — ordinary max over the
    /// total order above. Satisfies the law that `worst` is a semilattice
    /// operation (order-independent, idempotent).
    #[must_use]
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "OK",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl From<crate::normalize::ExitCodeClass> for HealthState {
    fn from(class: crate::normalize::ExitCodeClass) -> Self {
        match class {
            crate::normalize::ExitCodeClass::Ok => Self::Ok,
            crate::normalize::ExitCodeClass::Warning => Self::Warning,
            crate::normalize::ExitCodeClass::Critical => Self::Critical,
            crate::normalize::ExitCodeClass::Unknown => Self::Unknown,
        }
    }
}

impl From<pulsewatch_range::MetricAlert> for HealthState {
    fn from(alert: pulsewatch_range::MetricAlert) -> Self {
        match alert {
            pulsewatch_range::MetricAlert::Ok => Self::Ok,
            pulsewatch_range::MetricAlert::Warning => Self::Warning,
            pulsewatch_range::MetricAlert::Critical => Self::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_order_matches_spec() {
        assert!(HealthState::Ok < HealthState::Warning);
        assert!(HealthState::Warning < HealthState::Critical);
        assert!(HealthState::Critical < HealthState::Unknown);
    }

    #[test]
    fn worst_is_commutative() {
        let pairs = [
            (HealthState::Ok, HealthState::Warning),
            (HealthState::Critical, HealthState::Unknown),
            (HealthState::Warning, HealthState::Warning),
        ];
        for (a, b) in pairs {
            assert_eq!(a.worst(b), b.worst(a));
        }
    }

    #[test]
    fn worst_picks_higher_severity() {
        assert_eq!(HealthState::Ok.worst(HealthState::Critical), HealthState::Critical);
        assert_eq!(
            HealthState::Unknown.worst(HealthState::Ok),
            HealthState::Unknown
        );
    }

    #[test]
    fn serde_renames_ok_variant() {
        let json = serde_json::to_string(&HealthState::Ok).unwrap();
        assert_eq!(json, "\"OK\"");
    }
}
