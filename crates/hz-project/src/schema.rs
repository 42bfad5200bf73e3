//! Installation schema definitions.

use hz_zone::Priority;
use serde::{Deserialize, Serialize};

/// Current installation file version.
pub const LATEST_VERSION: u32 = 1;

/// One installation: the zones sharing a heat source, plus controller tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstallationDef {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub zones: Vec<ZoneDef>,
    /// Zone kept briefly open after shutoff to protect pump circulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discharge_zone: Option<String>,
    /// Overrides the default 5–80 °C flow-temperature band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_limits: Option<FlowLimitsDef>,
}

/// One heating zone as configured by the setup flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneDef {
    /// Stable key the event source uses to address this zone.
    pub id: String,
    pub name: String,
    /// Floor area in m²; only weights the preheat thermal load.
    pub floor_area_m2: f64,
    pub priority: Priority,
    /// External room sensor reference, when the TRV's own reading is not
    /// trusted (e.g. mounted right above a radiator).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_temp_sensor: Option<String>,
}

/// Flow-temperature band override (°C).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlowLimitsDef {
    pub min_c: f64,
    pub max_c: f64,
}
