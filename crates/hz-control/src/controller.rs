//! Master controller: one aggregate owning every zone and sub-machine.
//!
//! Single-threaded, single-writer: external events are delivered one at a
//! time and each recompute runs the fixed synchronous cycle
//! aggregator -> preheat -> commander -> discharge before the next event is
//! accepted. Timers are evaluated lazily inside the cycle; `now` is always
//! injected by the caller.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hz_core::{ZoneId, ensure_finite};
use hz_zone::{Priority, Zone};
use tracing::{debug, info, warn};

use crate::actuator::BoilerActuator;
use crate::aggregator::aggregate;
use crate::commander::FlowCommander;
use crate::discharge::DischargeMachine;
use crate::error::{ControlError, ControlResult};
use crate::events::ZoneEvent;
use crate::limits::FlowLimits;
use crate::preheat::Preheat;
use crate::snapshot::{ControllerSnapshot, DischargeSnapshot};

/// Zone descriptor consumed once at construction, produced by the external
/// setup flow.
#[derive(Debug, Clone)]
pub struct ZoneConfig {
    /// Stable key the event source uses to address this zone.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Floor area in m², used only for preheat thermal-load weighting.
    pub floor_area_m2: f64,
    pub priority: Priority,
    pub has_external_sensor: bool,
}

/// The aggregate controller for one installation.
///
/// Created once from static configuration; zones live for the whole
/// installation lifetime and are mutated only from within event handling.
#[derive(Debug)]
pub struct MasterController {
    zones: Vec<Zone>,
    keys: HashMap<String, ZoneId>,
    /// Master kill-switch; starts disabled until the embedder opts in.
    enabled: bool,
    commander: FlowCommander,
    preheat: Preheat,
    discharge: DischargeMachine,
}

impl MasterController {
    /// Build the controller from zone descriptors.
    ///
    /// A `discharge_key` naming no configured zone is tolerated: the
    /// discharge machine simply stays idle forever (the setup flow is
    /// expected to have validated the reference).
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate zone keys.
    pub fn new(
        zone_configs: &[ZoneConfig],
        discharge_key: Option<&str>,
        limits: FlowLimits,
    ) -> ControlResult<Self> {
        let mut zones = Vec::with_capacity(zone_configs.len());
        let mut keys = HashMap::with_capacity(zone_configs.len());

        for (index, config) in zone_configs.iter().enumerate() {
            let id = ZoneId::from_index(index as u32);
            if keys.insert(config.key.clone(), id).is_some() {
                return Err(ControlError::DuplicateZone {
                    key: config.key.clone(),
                });
            }
            zones.push(Zone::new(
                id,
                config.key.clone(),
                config.name.clone(),
                config.floor_area_m2,
                config.priority,
                config.has_external_sensor,
            ));
            info!(
                key = %config.key,
                name = %config.name,
                area = config.floor_area_m2,
                priority = ?config.priority,
                "zone registered"
            );
        }

        let discharge_zone = match discharge_key {
            Some(key) => match keys.get(key) {
                Some(&id) => Some(id),
                None => {
                    warn!(key, "discharge zone not found among configured zones");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            zones,
            keys,
            enabled: false,
            commander: FlowCommander::new(limits),
            preheat: Preheat::new(),
            discharge: DischargeMachine::new(discharge_zone),
        })
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.index() as usize)
    }

    /// Resolve a configuration key to the runtime zone id.
    pub fn zone_id(&self, key: &str) -> Option<ZoneId> {
        self.keys.get(key).copied()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last commanded flow temperature (°C; 0 = boiler off).
    pub fn current_flow_temp(&self) -> f64 {
        self.commander.current()
    }

    pub fn is_discharging(&self) -> bool {
        self.discharge.is_discharging()
    }

    /// Deliver one inbound event.
    ///
    /// Opening, preheat-window, and enable changes run the full cycle;
    /// temperature readings only update zone state. Malformed readings and
    /// unknown zone references are logged and skipped, never fatal.
    pub fn handle_event(
        &mut self,
        event: ZoneEvent,
        now: DateTime<Utc>,
        actuator: &mut dyn BoilerActuator,
    ) {
        match event {
            ZoneEvent::TemperatureChanged {
                zone,
                current,
                target,
            } => {
                if ensure_finite(current, "current temperature").is_err()
                    || ensure_finite(target, "target temperature").is_err()
                {
                    warn!(%zone, current, target, "skipping malformed temperature reading");
                    return;
                }
                match self.zone_mut(zone) {
                    Some(z) => z.update_temperature(current, target),
                    None => warn!(%zone, "temperature event for unknown zone ignored"),
                }
            }
            ZoneEvent::ExternalTemperatureChanged { zone, value } => {
                if ensure_finite(value, "external temperature").is_err() {
                    warn!(%zone, value, "skipping malformed external reading");
                    return;
                }
                match self.zone_mut(zone) {
                    Some(z) => z.update_external_temperature(value),
                    None => warn!(%zone, "external reading for unknown zone ignored"),
                }
            }
            ZoneEvent::OpeningChanged { zone, percent } => {
                if ensure_finite(percent, "valve opening").is_ok() {
                    match self.zone_mut(zone) {
                        Some(z) => {
                            if z.update_opening(percent) {
                                let offset = z.calibration_offset();
                                actuator.set_calibration_offset(zone, offset);
                            }
                        }
                        None => warn!(%zone, "opening event for unknown zone ignored"),
                    }
                } else {
                    warn!(%zone, percent, "skipping malformed opening reading");
                }
                self.recompute(now, actuator);
            }
            ZoneEvent::PreheatWindowChanged { end } => {
                info!(?end, "preheat window changed");
                self.preheat.set_window(end);
                self.recompute(now, actuator);
            }
            ZoneEvent::EnabledChanged { enabled } => {
                info!(enabled, "component enable changed");
                self.enabled = enabled;
                if enabled {
                    self.recompute(now, actuator);
                }
            }
        }
    }

    /// Run one full control cycle: aggregate -> preheat -> commander ->
    /// discharge.
    ///
    /// Safe to call at any time (the embedder may drive it from a scheduled
    /// tick to get prompt timer expiry); a disabled controller does nothing.
    pub fn recompute(&mut self, now: DateTime<Utc>, actuator: &mut dyn BoilerActuator) {
        if !self.enabled {
            debug!("controller disabled, skipping cycle");
            return;
        }

        let discharge_zone = self.discharge.zone();
        let decision = aggregate(&self.zones, discharge_zone);

        if decision.boiler_on {
            info!(demand = decision.demand, "boiler command: on");
        } else {
            info!("boiler command: off");
            // Shutdown releases every non-discharge valve from its heating
            // offset so they stop opening against a cold boiler.
            for zone in &mut self.zones {
                if discharge_zone == Some(zone.id()) {
                    continue;
                }
                if zone.reset_calibration_offset() {
                    actuator.set_calibration_offset(zone.id(), zone.calibration_offset());
                }
            }
        }

        let override_temp = self
            .preheat
            .flow_override(&self.zones, self.commander.limits(), now);
        if let Some(value) = override_temp {
            info!(value, "preheat override active");
        }

        let flow_temp = self
            .commander
            .command(decision.demand, decision.boiler_on, override_temp);
        actuator.set_flow_temperature(flow_temp);

        if let Some(cmd) = self.discharge.evaluate(decision.boiler_on, now) {
            actuator.set_discharge_output(cmd.zone, cmd.on);
        }
    }

    /// Update a zone's floor area (user-tunable at runtime).
    pub fn set_floor_area(&mut self, zone: ZoneId, area_m2: f64) {
        match self.zone_mut(zone) {
            Some(z) => z.set_floor_area(area_m2),
            None => warn!(%zone, "floor-area update for unknown zone ignored"),
        }
    }

    /// Reassign a zone's priority tier.
    pub fn set_priority(&mut self, zone: ZoneId, priority: Priority) {
        match self.zone_mut(zone) {
            Some(z) => z.set_priority(priority),
            None => warn!(%zone, "priority update for unknown zone ignored"),
        }
    }

    /// Enable or disable the preheat feature. Level-triggered: takes effect
    /// on the next recompute.
    pub fn set_preheat_enabled(&mut self, enabled: bool) {
        self.preheat.set_enabled(enabled);
    }

    /// Arm or clear the preheat deadline without forcing a cycle.
    pub fn set_preheat_window(&mut self, end: Option<DateTime<Utc>>) {
        self.preheat.set_window(end);
    }

    /// Reselect the designated discharge zone.
    ///
    /// An unknown key clears the selection. A discharge running for the old
    /// zone is stopped and its boost output released.
    pub fn set_discharge_zone(&mut self, key: Option<&str>, actuator: &mut dyn BoilerActuator) {
        let resolved = match key {
            Some(k) => {
                let id = self.zone_id(k);
                if id.is_none() {
                    warn!(key = k, "discharge zone not found among configured zones");
                }
                id
            }
            None => None,
        };
        if let Some(old) = self.discharge.set_zone(resolved) {
            actuator.set_discharge_output(old, false);
        }
    }

    /// Read-only state export for the display collaborator.
    pub fn snapshot(&self, now: DateTime<Utc>) -> ControllerSnapshot {
        let discharge_key = self
            .discharge
            .zone()
            .and_then(|id| self.zone(id))
            .map(|z| z.key().to_string());

        ControllerSnapshot {
            enabled: self.enabled,
            zone_count: self.zones.len(),
            flow_temp_c: self.commander.current(),
            preheat_active: self.preheat.is_active(now),
            zones: self.zones.iter().map(Zone::snapshot).collect(),
            discharge: DischargeSnapshot {
                active: self.discharge.is_discharging(),
                elapsed_secs: self.discharge.elapsed_secs(now),
                ..DischargeSnapshot::idle(discharge_key)
            },
        }
    }

    fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.zones.get_mut(id.index() as usize)
    }
}
