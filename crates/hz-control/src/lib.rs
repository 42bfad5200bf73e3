//! Zone demand aggregation and boiler control engine for hydrozone.
//!
//! This crate turns per-zone valve/temperature readings into a single boiler
//! command:
//!
//! - **aggregator**: priority-tiered demand scan over all zones, with the
//!   designated discharge zone excluded
//! - **preheat**: time-pressure-scaled flow-temperature override ahead of an
//!   externally-armed deadline
//! - **commander**: normalized demand -> clamped flow temperature
//! - **discharge**: bounded valve after-run following boiler shutoff
//! - **controller**: the aggregate that owns all of the above and drives the
//!   fixed recompute cycle
//!
//! # Design Principles
//!
//! - **Single writer**: all state is owned by one [`MasterController`];
//!   events are handled one at a time with a full synchronous recompute.
//! - **Injected time**: the engine never reads the clock. Deadlines and
//!   timeouts are evaluated lazily whenever a recompute runs, against the
//!   `now` supplied by the caller.
//! - **Commands at the seam**: outbound effects go through the
//!   [`BoilerActuator`] trait; the engine itself performs no I/O.

pub mod actuator;
pub mod aggregator;
pub mod commander;
pub mod controller;
pub mod discharge;
pub mod error;
pub mod events;
pub mod limits;
pub mod preheat;
pub mod snapshot;

pub use actuator::{BoilerActuator, NullActuator};
pub use aggregator::{AggregateDemand, LOW_TIER_AGGREGATE_THRESHOLD, aggregate};
pub use commander::FlowCommander;
pub use controller::{MasterController, ZoneConfig};
pub use discharge::{BoostCommand, DischargeMachine, DischargePhase, PUMP_DISCHARGE_TIMEOUT_SECS};
pub use error::{ControlError, ControlResult};
pub use events::ZoneEvent;
pub use limits::{DEFAULT_MAX_FLOW_TEMP, DEFAULT_MIN_FLOW_TEMP, FlowLimits};
pub use preheat::{PREHEAT_GAIN, Preheat};
pub use snapshot::{ControllerSnapshot, DischargeSnapshot};
