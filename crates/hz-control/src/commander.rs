//! Flow-temperature commander: normalized demand in, clamped °C out.

use tracing::debug;

use crate::limits::FlowLimits;

/// Maps the aggregate demand decision to the physical flow-temperature
/// output and records the last commanded value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowCommander {
    limits: FlowLimits,
    current: f64,
}

impl FlowCommander {
    /// Starts with the boiler off (commanded value 0).
    pub fn new(limits: FlowLimits) -> Self {
        Self {
            limits,
            current: 0.0,
        }
    }

    pub fn limits(&self) -> FlowLimits {
        self.limits
    }

    /// Last value accepted as the commanded state (°C).
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Compute and record the flow-temperature command.
    ///
    /// A preheat override wins verbatim (it is already clamped). Otherwise a
    /// running boiler maps demand linearly across the limit band. "Off" is
    /// commanded as `0.0`, the one value exempt from the floor clamp.
    pub fn command(&mut self, demand: f64, boiler_on: bool, preheat_override: Option<f64>) -> f64 {
        let requested = if let Some(override_temp) = preheat_override {
            override_temp
        } else if boiler_on && demand > 0.0 {
            self.limits.min + demand * self.limits.span()
        } else {
            0.0
        };

        let accepted = if requested > 0.0 {
            self.limits.clamp(requested)
        } else {
            0.0
        };

        debug!(demand, boiler_on, requested, accepted, "flow temperature commanded");
        self.current = accepted;
        accepted
    }
}
