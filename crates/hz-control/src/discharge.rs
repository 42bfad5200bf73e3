//! Pump discharge: bounded after-run for one designated valve.
//!
//! When the boiler stops, the circulation pump stops with it, trapping hot
//! water in the pipes. Keeping one designated valve open for a bounded window
//! after shutoff lets the remaining heat circulate out of that branch. The
//! machine triggers only on a fresh ON->OFF edge and yields immediately if
//! zones need heat again.

use chrono::{DateTime, Utc};
use hz_core::ZoneId;
use tracing::{debug, info};

/// After-run duration before the discharge valve is released (seconds).
pub const PUMP_DISCHARGE_TIMEOUT_SECS: f64 = 300.0;

/// Discharge machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DischargePhase {
    #[default]
    Idle,
    Discharging,
}

/// Boost-output command surfaced by a phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostCommand {
    pub zone: ZoneId,
    pub on: bool,
}

/// State machine keeping one valve open for a bounded window after shutoff.
///
/// With no designated zone the machine stays permanently [`DischargePhase::Idle`]
/// and only tracks the previous boiler state for edge detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DischargeMachine {
    zone: Option<ZoneId>,
    phase: DischargePhase,
    started_at: Option<DateTime<Utc>>,
    boiler_was_on: bool,
}

impl DischargeMachine {
    pub fn new(zone: Option<ZoneId>) -> Self {
        Self {
            zone,
            phase: DischargePhase::Idle,
            started_at: None,
            boiler_was_on: false,
        }
    }

    pub fn zone(&self) -> Option<ZoneId> {
        self.zone
    }

    pub fn is_discharging(&self) -> bool {
        self.phase == DischargePhase::Discharging
    }

    /// Seconds since the current discharge started; zero while idle.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        match self.started_at {
            Some(start) if self.is_discharging() => {
                (now - start).num_milliseconds() as f64 / 1000.0
            }
            _ => 0.0,
        }
    }

    /// Reselect the designated zone.
    ///
    /// A discharge running for the old zone is stopped; the old zone id is
    /// returned so the caller can release its boost output.
    pub fn set_zone(&mut self, zone: Option<ZoneId>) -> Option<ZoneId> {
        if self.zone == zone {
            return None;
        }
        let cancelled = if self.is_discharging() {
            self.phase = DischargePhase::Idle;
            self.started_at = None;
            self.zone
        } else {
            None
        };
        self.zone = zone;
        cancelled
    }

    /// Advance the machine with the boiler decision of the current cycle.
    ///
    /// Transitions:
    /// - Idle -> Discharging exactly on an ON->OFF edge of the boiler decision;
    ///   re-evaluating while already off must not re-trigger.
    /// - Discharging -> Idle when `elapsed > PUMP_DISCHARGE_TIMEOUT_SECS`.
    /// - Discharging -> Idle immediately when the boiler decision is ON again,
    ///   regardless of elapsed time.
    ///
    /// Returns the boost-output change to apply, if any.
    pub fn evaluate(&mut self, boiler_on: bool, now: DateTime<Utc>) -> Option<BoostCommand> {
        let Some(zone) = self.zone else {
            self.boiler_was_on = boiler_on;
            return None;
        };

        if boiler_on {
            self.boiler_was_on = true;
            if self.is_discharging() {
                self.phase = DischargePhase::Idle;
                self.started_at = None;
                info!(%zone, "discharge cancelled: boiler reactivated");
                return Some(BoostCommand { zone, on: false });
            }
            return None;
        }

        let just_turned_off = self.boiler_was_on;
        self.boiler_was_on = false;

        match self.phase {
            DischargePhase::Idle if just_turned_off => {
                self.phase = DischargePhase::Discharging;
                self.started_at = Some(now);
                info!(%zone, timeout = PUMP_DISCHARGE_TIMEOUT_SECS, "discharge started");
                Some(BoostCommand { zone, on: true })
            }
            DischargePhase::Discharging => {
                let elapsed = self.elapsed_secs(now);
                if elapsed > PUMP_DISCHARGE_TIMEOUT_SECS {
                    self.phase = DischargePhase::Idle;
                    self.started_at = None;
                    info!(%zone, elapsed, "discharge timeout elapsed");
                    Some(BoostCommand { zone, on: false })
                } else {
                    debug!(%zone, elapsed, "discharge running");
                    None
                }
            }
            DischargePhase::Idle => None,
        }
    }
}
