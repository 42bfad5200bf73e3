//! Replay scenario schema: a timed list of inbound events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deterministic event sequence replayed against an installation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDef {
    pub name: String,
    /// Wall-clock instant of `at_s = 0`.
    pub start: DateTime<Utc>,
    /// Arm the preheat feature before the first step.
    #[serde(default)]
    pub preheat_enabled: bool,
    #[serde(default)]
    pub steps: Vec<StepDef>,
}

/// One timed step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepDef {
    /// Seconds after the scenario start; must not decrease between steps.
    pub at_s: f64,
    pub event: EventDef,
}

/// Serialized twin of the engine's inbound event set, addressing zones by
/// their configuration key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventDef {
    OpeningChanged {
        zone: String,
        percent: f64,
    },
    TemperatureChanged {
        zone: String,
        current_c: f64,
        target_c: f64,
    },
    ExternalTemperatureChanged {
        zone: String,
        value_c: f64,
    },
    PreheatWindowChanged {
        #[serde(default)]
        end: Option<DateTime<Utc>>,
    },
    EnabledChanged {
        enabled: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_events_parse() {
        let yaml = r#"
name: Morning warm-up
start: 2026-01-10T06:00:00Z
preheat_enabled: true
steps:
  - at_s: 0.0
    event:
      type: enabled_changed
      enabled: true
  - at_s: 5.0
    event:
      type: temperature_changed
      zone: living
      current_c: 17.5
      target_c: 21.0
  - at_s: 10.0
    event:
      type: opening_changed
      zone: living
      percent: 80.0
  - at_s: 20.0
    event:
      type: preheat_window_changed
      end: 2026-01-10T07:00:00Z
  - at_s: 30.0
    event:
      type: preheat_window_changed
"#;
        let scenario: ScenarioDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scenario.steps.len(), 5);
        assert!(scenario.preheat_enabled);
        assert!(matches!(
            scenario.steps[2].event,
            EventDef::OpeningChanged { ref zone, percent } if zone == "living" && percent == 80.0
        ));
        assert!(matches!(
            scenario.steps[4].event,
            EventDef::PreheatWindowChanged { end: None }
        ));
    }
}
