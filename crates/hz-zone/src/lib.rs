//! Zone state and heat-demand rules for hydrozone.
//!
//! A zone is one room/area with its own thermostatic radiator valve (TRV) and
//! temperature target. This crate owns the leaf-level state and the two
//! central business rules:
//!
//! - the priority-gated demand threshold (any opening for high-priority
//!   zones, full opening for low-priority zones), and
//! - the calibration-offset side effect that nudges a valve further open
//!   while boiler heat is being supplied.
//!
//! Aggregation across zones lives in `hz-control`; a `Zone` never looks at
//! its neighbours.

pub mod priority;
pub mod zone;

pub use priority::Priority;
pub use zone::{
    DEFAULT_CALIBRATION_OFFSET, HEATING_CALIBRATION_OFFSET, MAX_CALIBRATION_OFFSET,
    MIN_CALIBRATION_OFFSET, Zone, ZoneSnapshot,
};
