//! Demand aggregation: many zones in, one boiler decision out.

use hz_core::ZoneId;
use hz_zone::{Priority, Zone};
use tracing::debug;

/// Aggregate opening at which the low tier jointly triggers the boiler (%).
pub const LOW_TIER_AGGREGATE_THRESHOLD: f64 = 100.0;

/// Outcome of scanning every zone for heat demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateDemand {
    /// Whether the boiler should be running.
    pub boiler_on: bool,
    /// Normalized intensity in [0, 1] backing the flow-temperature command.
    pub demand: f64,
    /// Sum of low-tier valve openings (%), for diagnostics.
    pub low_tier_opening_sum: f64,
}

impl AggregateDemand {
    /// The quiescent decision: boiler off, no demand.
    pub fn off() -> Self {
        Self {
            boiler_on: false,
            demand: 0.0,
            low_tier_opening_sum: 0.0,
        }
    }
}

/// Combine all zones into a single boiler decision.
///
/// The designated discharge zone is skipped entirely, whatever its opening or
/// priority. Decision order:
///
/// 1. any demanding high-tier zone turns the boiler on at the highest
///    high-tier demand metric;
/// 2. otherwise low-tier zones jointly turn it on when their openings sum to
///    at least [`LOW_TIER_AGGREGATE_THRESHOLD`], at the highest low-tier
///    metric;
/// 3. otherwise the boiler is off.
pub fn aggregate(zones: &[Zone], discharge: Option<ZoneId>) -> AggregateDemand {
    let mut high_demanding = false;
    let mut high_max = 0.0_f64;
    let mut low_sum = 0.0_f64;
    let mut low_max = 0.0_f64;

    for zone in zones {
        if discharge == Some(zone.id()) {
            debug!(zone = %zone.key(), "discharge valve excluded from aggregation");
            continue;
        }

        let metric = zone.demand_metric();
        match zone.priority() {
            Priority::High => {
                if zone.is_demanding_heat() {
                    high_demanding = true;
                }
                high_max = high_max.max(metric);
            }
            Priority::Low => {
                low_sum += zone.opening_percent();
                low_max = low_max.max(metric);
            }
        }
    }

    if high_demanding {
        debug!(demand = high_max, "boiler on: high-tier demand");
        return AggregateDemand {
            boiler_on: true,
            demand: high_max,
            low_tier_opening_sum: low_sum,
        };
    }

    if low_sum >= LOW_TIER_AGGREGATE_THRESHOLD {
        debug!(
            demand = low_max,
            low_sum, "boiler on: low-tier aggregate opening"
        );
        return AggregateDemand {
            boiler_on: true,
            demand: low_max,
            low_tier_opening_sum: low_sum,
        };
    }

    AggregateDemand {
        boiler_on: false,
        demand: 0.0,
        low_tier_opening_sum: low_sum,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hz_core::ZoneId;

    fn zone(index: u32, priority: Priority, opening: f64, error: f64) -> Zone {
        let mut z = Zone::new(
            ZoneId::from_index(index),
            format!("z{index}"),
            format!("Zone {index}"),
            10.0,
            priority,
            false,
        );
        z.update_temperature(21.0 - error, 21.0);
        z.update_opening(opening);
        z
    }

    #[test]
    fn no_zones_means_boiler_off() {
        let out = aggregate(&[], None);
        assert!(!out.boiler_on);
        assert_eq!(out.demand, 0.0);
    }

    #[test]
    fn single_high_zone_triggers_at_any_opening() {
        let zones = vec![zone(0, Priority::High, 1.0, 2.0)];
        let out = aggregate(&zones, None);
        assert!(out.boiler_on);
        assert!((out.demand - 0.01).abs() < 1e-12);
    }

    #[test]
    fn high_tier_wins_with_highest_metric() {
        let zones = vec![
            zone(0, Priority::High, 30.0, 2.0),
            zone(1, Priority::High, 70.0, 1.0),
            zone(2, Priority::Low, 100.0, 3.0),
        ];
        let out = aggregate(&zones, None);
        assert!(out.boiler_on);
        assert!((out.demand - 0.7).abs() < 1e-12);
    }

    #[test]
    fn low_tier_aggregates_across_zones() {
        // 30 + 30 + 50 = 110 >= 100 even though no zone demands alone.
        let zones = vec![
            zone(0, Priority::Low, 30.0, 2.0),
            zone(1, Priority::Low, 30.0, 2.0),
            zone(2, Priority::Low, 50.0, 2.0),
        ];
        let out = aggregate(&zones, None);
        assert!(out.boiler_on);
        assert!((out.demand - 0.5).abs() < 1e-12);
        assert!((out.low_tier_opening_sum - 110.0).abs() < 1e-12);
    }

    #[test]
    fn low_tier_below_threshold_stays_off() {
        let zones = vec![
            zone(0, Priority::Low, 40.0, 2.0),
            zone(1, Priority::Low, 50.0, 2.0),
        ];
        let out = aggregate(&zones, None);
        assert!(!out.boiler_on);
        assert_eq!(out.demand, 0.0);
    }

    #[test]
    fn discharge_zone_never_triggers_boiler() {
        let zones = vec![zone(0, Priority::High, 100.0, 3.0)];
        let out = aggregate(&zones, Some(ZoneId::from_index(0)));
        assert!(!out.boiler_on);
        assert_eq!(out.demand, 0.0);
    }

    #[test]
    fn discharge_zone_excluded_from_low_aggregate() {
        let zones = vec![
            zone(0, Priority::Low, 60.0, 2.0),
            zone(1, Priority::Low, 60.0, 2.0),
        ];
        // Together they would cross the threshold; excluding one keeps it off.
        let out = aggregate(&zones, Some(ZoneId::from_index(1)));
        assert!(!out.boiler_on);
        assert!((out.low_tier_opening_sum - 60.0).abs() < 1e-12);
    }
}
