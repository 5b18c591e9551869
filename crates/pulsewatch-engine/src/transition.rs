use chrono::{DateTime, Utc};
use pulsewatch_status::{CheckRecord, HealthState, Observation};

use crate::store::CheckStore;

/// A confirmed status change, ready for action dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub check_name: String,
    pub from_state: HealthState,
    pub to_state: HealthState,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    /// Set when the change required `repeat` consecutive confirmations to
    /// harden.
    pub repeat_count: Option<u32>,
}

/// Folds observations into a [`CheckStore`], applying the five-step
/// algorithm from the transition engine design: metric escalation, soft/hard
/// flapping suppression, and change-event emission.
#[derive(Debug, Default)]
pub struct TransitionEngine {
    store: CheckStore,
}

impl TransitionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self { store: CheckStore::default() }
    }

    #[must_use]
    pub fn with_store(store: CheckStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &CheckStore {
        &self.store
    }

    pub fn into_store(self) -> CheckStore {
        self.store
    }

    /// Apply one check's observation, returning a [`ChangeEvent`] only when
    /// the hard status actually changed this call.
    ///
    /// `repeat` is the check's configured repeat-count (0 means changes are
    /// immediate).
    pub fn apply(
        &mut self,
        check_name: &str,
        observation: &Observation,
        repeat: u32,
        now: DateTime<Utc>,
    ) -> Option<ChangeEvent> {
        // Step 2: fold each metric's own evaluation; remember the worst one
        // for the reason string.
        let metric_derived = observation.worst_metric();
        let metric_state = metric_derived.map_or(HealthState::Ok, |(_, state)| state);

        // Step 3: the engine's asymmetric escalation — Unknown only
        // propagates when it is the observation's own status.
        let worst = escalate(observation.status, metric_state);

        // A metric "drove" the result only when it pushed the status past
        // what the observation's own status would have reached alone.
        let reason = match metric_derived {
            Some((label, _)) if metric_state == worst && metric_state != HealthState::Ok => {
                format!("Check '{check_name}' metric '{label}' set the state to {worst}")
            }
            _ => format!("Check '{check_name}' set the state to {worst}"),
        };

        // Step 1: load prior record, or synthesize one from this observation.
        let prior = self.store.get(check_name).cloned().unwrap_or_else(|| {
            CheckRecord::from_observation(observation, reason.clone(), now)
        });

        let mut new_record = CheckRecord {
            status: worst,
            status_reason: reason.clone(),
            timestamp: now,
            soft_status: None,
            soft_status_reason: None,
            repeat_count: prior.repeat_count,
            message: observation.message.clone(),
            metrics: observation.metrics.clone(),
            extended_message: observation.extended_message.clone(),
        };

        // Step 4: no change in worst status - just refresh ancillary fields.
        // status_reason is already the freshly computed `reason`, not the
        // prior record's — every branch reflects the latest observation.
        if worst == prior.status {
            new_record.repeat_count = 0;
            self.store.insert(check_name, new_record);
            return None;
        }

        // Step 5: consult repeat config.
        if repeat == 0 {
            let event = ChangeEvent {
                check_name: check_name.to_string(),
                from_state: prior.status,
                to_state: worst,
                reason: reason.clone(),
                timestamp: now,
                repeat_count: None,
            };
            self.store.insert(check_name, new_record);
            return Some(event);
        }

        let current_count = prior.repeat_count + 1;
        if current_count >= repeat {
            new_record.repeat_count = repeat;
            let event = ChangeEvent {
                check_name: check_name.to_string(),
                from_state: prior.status,
                to_state: worst,
                reason: reason.clone(),
                timestamp: now,
                repeat_count: Some(repeat),
            };
            self.store.insert(check_name, new_record);
            return Some(event);
        }

        // Problem exists, but hasn't hardened yet: keep the hard status,
        // record the soft candidate.
        new_record.status = prior.status;
        new_record.status_reason = prior.status_reason.clone();
        new_record.repeat_count = current_count;
        new_record.soft_status = Some(worst);
        new_record.soft_status_reason = Some(reason);
        self.store.insert(check_name, new_record);
        None
    }
}

/// The transition engine's asymmetric "worst of" rule: ordinary max across
/// `{Ok, Warning, Critical}`, but `Unknown` is sticky — it only survives
/// when it's already the observation status, and it is never escalated
/// *into* by a metric (metrics can't produce `Unknown`).
#[must_use]
pub fn escalate(observation_status: HealthState, metric_derived: HealthState) -> HealthState {
    match observation_status {
        HealthState::Ok => metric_derived,
        HealthState::Warning => {
            if metric_derived == HealthState::Critical {
                HealthState::Critical
            } else {
                HealthState::Warning
            }
        }
        HealthState::Critical => HealthState::Critical,
        HealthState::Unknown => HealthState::Unknown,
    }
}
