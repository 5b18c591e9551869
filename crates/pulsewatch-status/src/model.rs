use chrono::{DateTime, Utc};
use pulsewatch_range::Range;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::state::HealthState;

/// A named numeric observation carried by a check's output.
///
/// The unit-of-measurement string is opaque: recorded for display, never
/// acted on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<Range>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
}

impl Metric {
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self { value, warning: None, critical: None, unit: String::new() }
    }

    /// The state this metric alone justifies, per §4.1: critical range
    /// first, then warning.
    #[must_use]
    pub fn evaluate(&self) -> HealthState {
        pulsewatch_range::check_metric_in_range(
            self.value,
            self.warning.as_ref(),
            self.critical.as_ref(),
        )
        .into()
    }
}

/// The parsed result of one invocation of one check, before it is folded
/// into the store. A single invocation may yield many observations (the
/// native multi-check format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub check_name: String,
    pub status: HealthState,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_message: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, Metric>,
}

impl Observation {
    #[must_use]
    pub fn new(check_name: impl Into<String>, status: HealthState, message: impl Into<String>) -> Self {
        Self {
            check_name: check_name.into(),
            status,
            message: message.into(),
            extended_message: None,
            metrics: BTreeMap::new(),
        }
    }

    /// Fold every metric's individually-evaluated state with `worst`,
    /// remembering which metric (if any) drove the result — used for the
    /// transition engine's reason string.
    #[must_use]
    pub fn worst_metric(&self) -> Option<(&str, HealthState)> {
        self.metrics
            .iter()
            .map(|(label, metric)| (label.as_str(), metric.evaluate()))
            .max_by_key(|(_, state)| *state)
    }
}

/// The persistent per-check entry in the in-memory store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub status: HealthState,
    pub status_reason: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_status: Option<HealthState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_status_reason: Option<String>,
    #[serde(default)]
    pub repeat_count: u32,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_message: Option<String>,
}

impl CheckRecord {
    /// Synthesize a fresh record from a first-sight observation: the
    /// transition engine's step 1 fallback when no prior record exists.
    #[must_use]
    pub fn from_observation(observation: &Observation, reason: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            status: observation.status,
            status_reason: reason,
            timestamp,
            soft_status: None,
            soft_status_reason: None,
            repeat_count: 0,
            message: observation.message.clone(),
            metrics: observation.metrics.clone(),
            extended_message: observation.extended_message.clone(),
        }
    }

    /// A soft-status is present iff `repeat_count > 0` and it differs from
    /// the hardened status (spec.md §3 invariant).
    #[must_use]
    pub fn has_pending_soft_state(&self) -> bool {
        self.repeat_count > 0 && self.soft_status.is_some_and(|s| s != self.status)
    }
}

/// The `state.json` schema version this build writes. Bump when a change to
/// [`Snapshot`] or [`CheckRecord`] would break an older reader.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// A full state snapshot as persisted to `state.json` and POSTed to the
/// remote collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub agent_version: String,
    pub hostname: String,
    pub timestamp: DateTime<Utc>,
    pub checks: BTreeMap<String, CheckRecord>,
}
