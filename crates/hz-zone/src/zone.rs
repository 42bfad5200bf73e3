//! Zone state: readings, demand rule, calibration offset.

use hz_core::{ZoneId, clamp_percent, clamp_unit};
use serde::Serialize;
use tracing::debug;

use crate::priority::Priority;

/// Calibration offset range supported by typical smart TRVs (°C).
pub const MIN_CALIBRATION_OFFSET: f64 = -5.0;
pub const MAX_CALIBRATION_OFFSET: f64 = 5.0;

/// Neutral offset: the valve trusts its own reading.
pub const DEFAULT_CALIBRATION_OFFSET: f64 = 0.0;

/// Offset applied while the valve is opening: makes the TRV read colder so it
/// keeps opening while boiler heat is being supplied.
pub const HEATING_CALIBRATION_OFFSET: f64 = -2.0;

/// Low-priority zones only count as demanding at full opening.
pub const LOW_PRIORITY_MIN_OPENING: f64 = 100.0;

/// One heating zone: a room/area with its own TRV and temperature target.
///
/// All fields are owned by the controller and mutated only from within a
/// recompute cycle; derived demand state is recomputed on every input change
/// and never stored stale.
#[derive(Debug, Clone)]
pub struct Zone {
    id: ZoneId,
    key: String,
    name: String,
    floor_area_m2: f64,
    priority: Priority,

    current_temp: f64,
    target_temp: f64,
    /// target - current; positive = too cold.
    error: f64,

    /// TRV valve opening, clamped to 0..100 %.
    opening_percent: f64,
    demanding: bool,

    /// Current calibration offset pushed back out to the valve (°C).
    calibration_offset: f64,

    has_external_sensor: bool,
    /// Latest external sensor reading; informational only, never feeds demand.
    external_temp: Option<f64>,
}

impl Zone {
    pub fn new(
        id: ZoneId,
        key: impl Into<String>,
        name: impl Into<String>,
        floor_area_m2: f64,
        priority: Priority,
        has_external_sensor: bool,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            name: name.into(),
            floor_area_m2: floor_area_m2.max(0.0),
            priority,
            current_temp: 20.0,
            target_temp: 20.0,
            error: 0.0,
            opening_percent: 0.0,
            demanding: false,
            calibration_offset: DEFAULT_CALIBRATION_OFFSET,
            has_external_sensor,
            external_temp: None,
        }
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn floor_area_m2(&self) -> f64 {
        self.floor_area_m2
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn current_temp(&self) -> f64 {
        self.current_temp
    }

    pub fn target_temp(&self) -> f64 {
        self.target_temp
    }

    /// Temperature error (target − current); positive = too cold.
    pub fn error(&self) -> f64 {
        self.error
    }

    pub fn opening_percent(&self) -> f64 {
        self.opening_percent
    }

    /// Whether this zone's opening crosses its priority-gated threshold.
    pub fn is_demanding_heat(&self) -> bool {
        self.demanding
    }

    pub fn calibration_offset(&self) -> f64 {
        self.calibration_offset
    }

    pub fn has_external_sensor(&self) -> bool {
        self.has_external_sensor
    }

    pub fn external_temp(&self) -> Option<f64> {
        self.external_temp
    }

    /// Update temperature readings and recompute the derived error + demand.
    pub fn update_temperature(&mut self, current: f64, target: f64) {
        self.current_temp = current;
        self.target_temp = target;
        self.error = target - current;
        self.recompute_demand();
        debug!(
            zone = %self.key,
            current, target,
            error = self.error,
            demanding = self.demanding,
            "temperature updated"
        );
    }

    /// Update the TRV opening percentage from a sensor reading.
    ///
    /// The raw value is clamped to 0..100 %. A strict increase counts as an
    /// opening transition and pins the calibration offset to
    /// [`HEATING_CALIBRATION_OFFSET`]; closing all the way to exactly 0 %
    /// restores [`DEFAULT_CALIBRATION_OFFSET`]. Equal values are a no-op
    /// transition.
    ///
    /// Returns `true` iff the calibration offset changed, so the caller knows
    /// to propagate it to the physical valve.
    pub fn update_opening(&mut self, percent: f64) -> bool {
        let next = clamp_percent(percent);
        let prev = self.opening_percent;
        self.opening_percent = next;
        self.recompute_demand();

        let before = self.calibration_offset;
        if next > prev {
            self.calibration_offset = HEATING_CALIBRATION_OFFSET;
        } else if next < prev && next == 0.0 {
            self.calibration_offset = DEFAULT_CALIBRATION_OFFSET;
        }
        let offset_changed = self.calibration_offset != before;

        debug!(
            zone = %self.key,
            opening = self.opening_percent,
            demanding = self.demanding,
            offset = self.calibration_offset,
            offset_changed,
            "opening updated"
        );
        offset_changed
    }

    /// Store an external temperature reading. Informational only.
    pub fn update_external_temperature(&mut self, value: f64) {
        self.external_temp = Some(value);
        debug!(zone = %self.key, value, "external temperature updated");
    }

    /// Normalized [0, 1] measure of how urgently this zone wants heat.
    ///
    /// Zero once the target is met (`error <= 0`) regardless of valve
    /// position; otherwise the normalized opening.
    pub fn demand_metric(&self) -> f64 {
        if self.error <= 0.0 {
            return 0.0;
        }
        clamp_unit(self.opening_percent / 100.0)
    }

    /// Set the calibration offset, silently clamped to the valve's range.
    pub fn set_calibration_offset(&mut self, offset: f64) {
        self.calibration_offset = offset.clamp(MIN_CALIBRATION_OFFSET, MAX_CALIBRATION_OFFSET);
    }

    /// Restore the neutral calibration offset.
    ///
    /// Returns `true` iff the offset actually changed.
    pub fn reset_calibration_offset(&mut self) -> bool {
        if self.calibration_offset == DEFAULT_CALIBRATION_OFFSET {
            return false;
        }
        self.calibration_offset = DEFAULT_CALIBRATION_OFFSET;
        true
    }

    /// Update the floor area (user-tunable at runtime; negative input narrows
    /// to zero).
    pub fn set_floor_area(&mut self, area_m2: f64) {
        self.floor_area_m2 = area_m2.max(0.0);
    }

    /// Reassign the priority tier and recompute demand under the new rule.
    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.recompute_demand();
    }

    fn recompute_demand(&mut self) {
        self.demanding = match self.priority {
            Priority::High => self.opening_percent > 0.0,
            Priority::Low => self.opening_percent >= LOW_PRIORITY_MIN_OPENING,
        };
    }

    /// Read-only state export for the display collaborator.
    pub fn snapshot(&self) -> ZoneSnapshot {
        ZoneSnapshot {
            key: self.key.clone(),
            name: self.name.clone(),
            floor_area_m2: self.floor_area_m2,
            priority: self.priority,
            current_temp_c: self.current_temp,
            target_temp_c: self.target_temp,
            error_c: self.error,
            opening_percent: self.opening_percent,
            demanding: self.demanding,
            demand_metric: self.demand_metric(),
            calibration_offset_c: self.calibration_offset,
            external_temp_c: if self.has_external_sensor {
                self.external_temp
            } else {
                None
            },
        }
    }
}

/// Read-only per-zone state for display/logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSnapshot {
    pub key: String,
    pub name: String,
    pub floor_area_m2: f64,
    pub priority: Priority,
    pub current_temp_c: f64,
    pub target_temp_c: f64,
    pub error_c: f64,
    pub opening_percent: f64,
    pub demanding: bool,
    pub demand_metric: f64,
    pub calibration_offset_c: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_temp_c: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(priority: Priority) -> Zone {
        Zone::new(ZoneId::from_index(0), "z0", "Test zone", 12.0, priority, false)
    }

    #[test]
    fn high_priority_demands_at_any_opening() {
        let mut z = zone(Priority::High);
        assert!(!z.is_demanding_heat());
        z.update_opening(1.0);
        assert!(z.is_demanding_heat());
        z.update_opening(0.0);
        assert!(!z.is_demanding_heat());
    }

    #[test]
    fn low_priority_demands_only_at_full_opening() {
        let mut z = zone(Priority::Low);
        z.update_opening(99.0);
        assert!(!z.is_demanding_heat());
        z.update_opening(100.0);
        assert!(z.is_demanding_heat());
    }

    #[test]
    fn opening_clamped_to_physical_range() {
        let mut z = zone(Priority::High);
        z.update_opening(150.0);
        assert_eq!(z.opening_percent(), 100.0);
        z.update_opening(-10.0);
        assert_eq!(z.opening_percent(), 0.0);
    }

    #[test]
    fn demand_metric_zero_at_target() {
        let mut z = zone(Priority::High);
        z.update_opening(80.0);
        // Target met: metric is zero no matter the opening.
        z.update_temperature(21.0, 21.0);
        assert_eq!(z.demand_metric(), 0.0);
        z.update_temperature(22.0, 21.0);
        assert_eq!(z.demand_metric(), 0.0);
    }

    #[test]
    fn demand_metric_is_normalized_opening_when_cold() {
        let mut z = zone(Priority::High);
        z.update_temperature(18.0, 21.0);
        z.update_opening(80.0);
        assert!((z.demand_metric() - 0.8).abs() < 1e-12);
        z.update_opening(100.0);
        assert!((z.demand_metric() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn opening_transition_applies_heating_offset() {
        let mut z = zone(Priority::High);
        assert_eq!(z.calibration_offset(), DEFAULT_CALIBRATION_OFFSET);

        let changed = z.update_opening(40.0);
        assert!(changed);
        assert_eq!(z.calibration_offset(), HEATING_CALIBRATION_OFFSET);

        // Closing but not fully: offset stays pinned.
        let changed = z.update_opening(20.0);
        assert!(!changed);
        assert_eq!(z.calibration_offset(), HEATING_CALIBRATION_OFFSET);

        // Fully closed: offset back to default.
        let changed = z.update_opening(0.0);
        assert!(changed);
        assert_eq!(z.calibration_offset(), DEFAULT_CALIBRATION_OFFSET);
    }

    #[test]
    fn one_percent_opening_still_triggers_offset() {
        let mut z = zone(Priority::High);
        z.update_opening(1.0);
        assert_eq!(z.calibration_offset(), HEATING_CALIBRATION_OFFSET);
    }

    #[test]
    fn equal_opening_is_a_no_op_transition() {
        let mut z = zone(Priority::High);
        z.update_opening(50.0);
        assert_eq!(z.calibration_offset(), HEATING_CALIBRATION_OFFSET);
        z.reset_calibration_offset();
        // Same value again: neither an opening nor a closing transition.
        let changed = z.update_opening(50.0);
        assert!(!changed);
        assert_eq!(z.calibration_offset(), DEFAULT_CALIBRATION_OFFSET);
    }

    #[test]
    fn set_calibration_offset_clamps() {
        let mut z = zone(Priority::High);
        z.set_calibration_offset(-9.0);
        assert_eq!(z.calibration_offset(), MIN_CALIBRATION_OFFSET);
        z.set_calibration_offset(9.0);
        assert_eq!(z.calibration_offset(), MAX_CALIBRATION_OFFSET);
    }

    #[test]
    fn reset_calibration_offset_reports_change() {
        let mut z = zone(Priority::High);
        assert!(!z.reset_calibration_offset());
        z.update_opening(30.0);
        assert!(z.reset_calibration_offset());
        assert!(!z.reset_calibration_offset());
    }

    #[test]
    fn priority_change_recomputes_demand() {
        let mut z = zone(Priority::Low);
        z.update_opening(40.0);
        assert!(!z.is_demanding_heat());
        z.set_priority(Priority::High);
        assert!(z.is_demanding_heat());
        z.set_priority(Priority::Low);
        assert!(!z.is_demanding_heat());
    }

    #[test]
    fn temperature_error_sign() {
        let mut z = zone(Priority::High);
        z.update_temperature(18.5, 21.0);
        assert!((z.error() - 2.5).abs() < 1e-12);
        z.update_temperature(23.0, 21.0);
        assert!((z.error() + 2.0).abs() < 1e-12);
    }

    #[test]
    fn snapshot_hides_external_temp_without_sensor() {
        let mut z = zone(Priority::High);
        z.update_external_temperature(19.0);
        assert_eq!(z.snapshot().external_temp_c, None);

        let mut z = Zone::new(
            ZoneId::from_index(1),
            "z1",
            "With sensor",
            8.0,
            Priority::Low,
            true,
        );
        z.update_external_temperature(19.0);
        assert_eq!(z.snapshot().external_temp_c, Some(19.0));
    }

    #[test]
    fn negative_floor_area_narrows_to_zero() {
        let mut z = zone(Priority::High);
        z.set_floor_area(-4.0);
        assert_eq!(z.floor_area_m2(), 0.0);
    }
}
