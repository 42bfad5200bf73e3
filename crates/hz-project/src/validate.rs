//! Installation and scenario validation logic.

use std::collections::HashSet;

use crate::scenario::{EventDef, ScenarioDef};
use crate::schema::{InstallationDef, LATEST_VERSION};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_installation(installation: &InstallationDef) -> Result<(), ValidationError> {
    if installation.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: installation.version,
        });
    }

    if installation.zones.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "zones".to_string(),
            value: "[]".to_string(),
            reason: "an installation needs at least one zone".to_string(),
        });
    }

    let mut zone_ids = HashSet::new();
    for zone in &installation.zones {
        if zone.id.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "zone.id".to_string(),
                value: String::new(),
                reason: "zone id must not be empty".to_string(),
            });
        }
        if !zone_ids.insert(&zone.id) {
            return Err(ValidationError::DuplicateId {
                id: zone.id.clone(),
                context: "zones".to_string(),
            });
        }
        if !zone.floor_area_m2.is_finite() || zone.floor_area_m2 < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("zones[{}].floor_area_m2", zone.id),
                value: zone.floor_area_m2.to_string(),
                reason: "floor area must be finite and non-negative".to_string(),
            });
        }
    }

    if let Some(discharge) = &installation.discharge_zone {
        if !zone_ids.contains(discharge) {
            return Err(ValidationError::MissingReference {
                id: discharge.clone(),
                context: "discharge_zone".to_string(),
            });
        }
    }

    if let Some(limits) = &installation.flow_limits {
        if !limits.min_c.is_finite() || !limits.max_c.is_finite() || limits.min_c >= limits.max_c {
            return Err(ValidationError::InvalidValue {
                field: "flow_limits".to_string(),
                value: format!("{}..{}", limits.min_c, limits.max_c),
                reason: "bounds must be finite with min below max".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_scenario(
    scenario: &ScenarioDef,
    installation: &InstallationDef,
) -> Result<(), ValidationError> {
    let zone_ids: HashSet<&String> = installation.zones.iter().map(|z| &z.id).collect();

    let mut previous_at = 0.0_f64;
    for (index, step) in scenario.steps.iter().enumerate() {
        if !step.at_s.is_finite() || step.at_s < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("steps[{index}].at_s"),
                value: step.at_s.to_string(),
                reason: "step time must be finite and non-negative".to_string(),
            });
        }
        if step.at_s < previous_at {
            return Err(ValidationError::InvalidValue {
                field: format!("steps[{index}].at_s"),
                value: step.at_s.to_string(),
                reason: "step times must not decrease".to_string(),
            });
        }
        previous_at = step.at_s;

        let referenced = match &step.event {
            EventDef::OpeningChanged { zone, .. }
            | EventDef::TemperatureChanged { zone, .. }
            | EventDef::ExternalTemperatureChanged { zone, .. } => Some(zone),
            EventDef::PreheatWindowChanged { .. } | EventDef::EnabledChanged { .. } => None,
        };
        if let Some(zone) = referenced {
            if !zone_ids.contains(zone) {
                return Err(ValidationError::MissingReference {
                    id: zone.clone(),
                    context: format!("steps[{index}].event.zone"),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::StepDef;
    use crate::schema::{FlowLimitsDef, ZoneDef};
    use chrono::{TimeZone, Utc};
    use hz_zone::Priority;

    fn zone(id: &str) -> ZoneDef {
        ZoneDef {
            id: id.to_string(),
            name: id.to_uppercase(),
            floor_area_m2: 10.0,
            priority: Priority::High,
            ext_temp_sensor: None,
        }
    }

    fn installation(zones: Vec<ZoneDef>) -> InstallationDef {
        InstallationDef {
            version: LATEST_VERSION,
            name: "Test".to_string(),
            zones,
            discharge_zone: None,
            flow_limits: None,
        }
    }

    #[test]
    fn valid_installation_passes() {
        let def = installation(vec![zone("a"), zone("b")]);
        assert!(validate_installation(&def).is_ok());
    }

    #[test]
    fn duplicate_zone_ids_rejected() {
        let def = installation(vec![zone("a"), zone("a")]);
        assert!(matches!(
            validate_installation(&def),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn empty_installation_rejected() {
        let def = installation(vec![]);
        assert!(matches!(
            validate_installation(&def),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn negative_floor_area_rejected() {
        let mut def = installation(vec![zone("a")]);
        def.zones[0].floor_area_m2 = -1.0;
        assert!(matches!(
            validate_installation(&def),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn dangling_discharge_reference_rejected() {
        let mut def = installation(vec![zone("a")]);
        def.discharge_zone = Some("ghost".to_string());
        assert!(matches!(
            validate_installation(&def),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn inverted_flow_limits_rejected() {
        let mut def = installation(vec![zone("a")]);
        def.flow_limits = Some(FlowLimitsDef {
            min_c: 60.0,
            max_c: 25.0,
        });
        assert!(matches!(
            validate_installation(&def),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut def = installation(vec![zone("a")]);
        def.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_installation(&def),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn scenario_with_unknown_zone_rejected() {
        let def = installation(vec![zone("a")]);
        let scenario = ScenarioDef {
            name: "s".to_string(),
            start: Utc.with_ymd_and_hms(2026, 1, 10, 6, 0, 0).unwrap(),
            preheat_enabled: false,
            steps: vec![StepDef {
                at_s: 0.0,
                event: EventDef::OpeningChanged {
                    zone: "ghost".to_string(),
                    percent: 50.0,
                },
            }],
        };
        assert!(matches!(
            validate_scenario(&scenario, &def),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn scenario_steps_must_not_go_backwards() {
        let def = installation(vec![zone("a")]);
        let scenario = ScenarioDef {
            name: "s".to_string(),
            start: Utc.with_ymd_and_hms(2026, 1, 10, 6, 0, 0).unwrap(),
            preheat_enabled: false,
            steps: vec![
                StepDef {
                    at_s: 10.0,
                    event: EventDef::EnabledChanged { enabled: true },
                },
                StepDef {
                    at_s: 5.0,
                    event: EventDef::EnabledChanged { enabled: false },
                },
            ],
        };
        assert!(matches!(
            validate_scenario(&scenario, &def),
            Err(ValidationError::InvalidValue { .. })
        ));
    }
}
