//! Read-only controller state export for the display collaborator.

use hz_zone::ZoneSnapshot;
use serde::Serialize;

use crate::discharge::PUMP_DISCHARGE_TIMEOUT_SECS;

/// Discharge machine state as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DischargeSnapshot {
    /// Key of the designated discharge zone, if one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    pub active: bool,
    pub elapsed_secs: f64,
    pub timeout_secs: f64,
}

impl DischargeSnapshot {
    pub fn idle(zone: Option<String>) -> Self {
        Self {
            zone,
            active: false,
            elapsed_secs: 0.0,
            timeout_secs: PUMP_DISCHARGE_TIMEOUT_SECS,
        }
    }
}

/// Full controller state as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub enabled: bool,
    pub zone_count: usize,
    /// Last commanded flow temperature (°C; 0 = boiler off).
    pub flow_temp_c: f64,
    pub preheat_active: bool,
    pub zones: Vec<ZoneSnapshot>,
    pub discharge: DischargeSnapshot,
}
