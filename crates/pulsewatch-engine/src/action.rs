use pulsewatch_status::HealthState;
use serde::{Deserialize, Serialize};

/// An action to invoke: an executable plus its argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub executable: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Per-check action configuration: a state-specific action for each
/// reachable state, plus a catch-all default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionSet {
    #[serde(default, rename = "action_ok")]
    pub ok: Option<ActionSpec>,
    #[serde(default, rename = "action_warning")]
    pub warning: Option<ActionSpec>,
    #[serde(default, rename = "action_critical")]
    pub critical: Option<ActionSpec>,
    #[serde(default, rename = "action")]
    pub default: Option<ActionSpec>,
}

/// Pick the action to run for a transition to `to_state`: a state-specific
/// action (`action_ok`/`action_warning`/`action_critical`) first, falling
/// back to the generic `action`. `Unknown` has no dedicated key — it always
/// falls through to the default, since the source agent never defines an
/// `action_unknown`.
#[must_use]
pub fn select_action(actions: &ActionSet, to_state: HealthState) -> Option<&ActionSpec> {
    let specific = match to_state {
        HealthState::Ok => actions.ok.as_ref(),
        HealthState::Warning => actions.warning.as_ref(),
        HealthState::Critical => actions.critical.as_ref(),
        HealthState::Unknown => None,
    };
    specific.or(actions.default.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str) -> ActionSpec {
        ActionSpec { executable: name.to_string(), arguments: vec![] }
    }

    #[test]
    fn state_specific_action_wins() {
        let actions = ActionSet {
            critical: Some(spec("page")),
            default: Some(spec("log")),
            ..Default::default()
        };
        assert_eq!(select_action(&actions, HealthState::Critical).unwrap().executable, "page");
    }

    #[test]
    fn falls_back_to_default_when_no_specific_action() {
        let actions = ActionSet { default: Some(spec("log")), ..Default::default() };
        assert_eq!(select_action(&actions, HealthState::Warning).unwrap().executable, "log");
    }

    #[test]
    fn unknown_state_always_uses_default() {
        let actions = ActionSet { critical: Some(spec("page")), default: Some(spec("log")), ..Default::default() };
        assert_eq!(select_action(&actions, HealthState::Unknown).unwrap().executable, "log");
    }

    #[test]
    fn no_action_configured_is_none() {
        let actions = ActionSet::default();
        assert!(select_action(&actions, HealthState::Critical).is_none());
    }
}
