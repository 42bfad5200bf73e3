//! Preheat override: time-pressure-scaled flow temperature ahead of a
//! deadline.
//!
//! While a preheat window is armed, the normal demand-based mapping is
//! superseded by an aggressive ramp: the closer the deadline, the larger the
//! override, approaching the maximum flow temperature as the remaining time
//! goes to zero. Front-loading effort this way is intentional.

use chrono::{DateTime, Utc};
use hz_zone::{Priority, Zone};
use tracing::{debug, warn};

use crate::limits::FlowLimits;

/// Scales thermal load (°C·m²) per unit time pressure (1/s) to °C above the
/// minimum flow temperature. Tune empirically per installation.
pub const PREHEAT_GAIN: f64 = 1.0;

/// Preheat window state.
///
/// Timers are evaluated lazily: activity is only checked when the engine
/// recomputes, with `now` injected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Preheat {
    enabled: bool,
    end: Option<DateTime<Utc>>,
}

impl Preheat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Arm (or clear) the preheat deadline.
    pub fn set_window(&mut self, end: Option<DateTime<Utc>>) {
        self.end = end;
    }

    /// Active ⇔ enabled, armed, and the deadline is strictly in the future.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.enabled && matches!(self.end, Some(end) if end > now)
    }

    /// Compute the flow-temperature override, if preheat is active.
    ///
    /// `override = min + thermal_load × (1 / seconds_remaining) × PREHEAT_GAIN`,
    /// clamped into the limit band. Thermal load is the largest
    /// `error × floor_area` over high-priority zones still below target;
    /// low-priority zones never contribute.
    ///
    /// Failsafe: a deadline found expired at evaluation time clears the
    /// window and yields `None`, falling back to demand-based control until
    /// re-armed.
    pub fn flow_override(
        &mut self,
        zones: &[Zone],
        limits: FlowLimits,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let end = self.end?;

        let remaining_secs = (end - now).num_milliseconds() as f64 / 1000.0;
        if remaining_secs <= 0.0 {
            warn!("preheat window expired; falling back to demand-based control");
            self.end = None;
            return None;
        }

        let load = max_high_tier_thermal_load(zones);
        let time_pressure = 1.0 / remaining_secs;
        let override_temp = limits.clamp(limits.min + load * time_pressure * PREHEAT_GAIN);

        debug!(
            load,
            remaining_secs, time_pressure, override_temp, "preheat override computed"
        );
        Some(override_temp)
    }
}

/// Largest `error × floor_area` over high-priority zones with a positive
/// error; zero when none qualify.
fn max_high_tier_thermal_load(zones: &[Zone]) -> f64 {
    let mut max_load = 0.0_f64;
    for zone in zones {
        if zone.priority() == Priority::High && zone.error() > 0.0 {
            max_load = max_load.max(zone.error() * zone.floor_area_m2());
        }
    }
    max_load
}

#[cfg(test)]
mod tests {
    use super::*;
    use hz_core::ZoneId;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn zone(index: u32, priority: Priority, area: f64, error: f64) -> Zone {
        let mut z = Zone::new(
            ZoneId::from_index(index),
            format!("z{index}"),
            format!("Zone {index}"),
            area,
            priority,
            false,
        );
        z.update_temperature(21.0 - error, 21.0);
        z
    }

    #[test]
    fn inactive_without_window_or_enable() {
        let mut p = Preheat::new();
        assert!(!p.is_active(t(0)));

        p.set_window(Some(t(600)));
        assert!(!p.is_active(t(0)), "window alone is not enough");

        p.set_enabled(true);
        assert!(p.is_active(t(0)));

        p.set_window(None);
        assert!(!p.is_active(t(0)));
    }

    #[test]
    fn deadline_must_be_strictly_future() {
        let mut p = Preheat::new();
        p.set_enabled(true);
        p.set_window(Some(t(60)));
        assert!(p.is_active(t(59)));
        assert!(!p.is_active(t(60)));
        assert!(!p.is_active(t(61)));
    }

    #[test]
    fn override_scales_with_time_pressure() {
        let zones = vec![zone(0, Priority::High, 20.0, 2.0)]; // load = 40 °C·m²
        let limits = FlowLimits::default();

        let mut p = Preheat::new();
        p.set_enabled(true);
        p.set_window(Some(t(1000)));

        // 1000 s remaining: 5 + 40/1000 = 5.04
        let far = p.flow_override(&zones, limits, t(0)).unwrap();
        assert!((far - 5.04).abs() < 1e-9);

        // 10 s remaining: 5 + 40/10 = 9.0
        let near = p.flow_override(&zones, limits, t(990)).unwrap();
        assert!((near - 9.0).abs() < 1e-9);
    }

    #[test]
    fn shorter_window_never_yields_lower_override() {
        let zones = vec![zone(0, Priority::High, 15.0, 3.0)];
        let limits = FlowLimits::default();
        let mut p = Preheat::new();
        p.set_enabled(true);
        p.set_window(Some(t(3600)));

        let mut prev = 0.0;
        for elapsed in [0, 600, 1800, 3000, 3599] {
            let v = p.flow_override(&zones, limits, t(elapsed)).unwrap();
            assert!(v >= prev, "override must not drop as the deadline nears");
            prev = v;
        }
    }

    #[test]
    fn override_clamped_to_max() {
        // Huge load, one second remaining: way past the ceiling.
        let zones = vec![zone(0, Priority::High, 50.0, 8.0)];
        let limits = FlowLimits::default();
        let mut p = Preheat::new();
        p.set_enabled(true);
        p.set_window(Some(t(1)));

        let v = p.flow_override(&zones, limits, t(0)).unwrap();
        assert_eq!(v, limits.max);
    }

    #[test]
    fn no_qualifying_zone_rides_the_floor() {
        // Low priority and satisfied high zones contribute nothing.
        let zones = vec![
            zone(0, Priority::Low, 30.0, 5.0),
            zone(1, Priority::High, 30.0, -1.0),
        ];
        let limits = FlowLimits::default();
        let mut p = Preheat::new();
        p.set_enabled(true);
        p.set_window(Some(t(100)));

        let v = p.flow_override(&zones, limits, t(0)).unwrap();
        assert_eq!(v, limits.min);
    }

    #[test]
    fn expired_window_self_heals() {
        let zones = vec![zone(0, Priority::High, 20.0, 2.0)];
        let limits = FlowLimits::default();
        let mut p = Preheat::new();
        p.set_enabled(true);
        p.set_window(Some(t(10)));

        assert_eq!(p.flow_override(&zones, limits, t(20)), None);
        assert_eq!(p.end(), None, "expired deadline is cleared");
        // Still none afterwards, even at an earlier clock, until re-armed.
        assert_eq!(p.flow_override(&zones, limits, t(0)), None);
    }
}
