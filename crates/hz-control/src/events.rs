//! Inbound events from the external sensor/event source.

use chrono::{DateTime, Utc};
use hz_core::ZoneId;

/// One external observation delivered to the controller.
///
/// Events arrive one at a time; opening, preheat-window, and enable changes
/// trigger a full synchronous recompute, temperature readings only update
/// zone state (the next recompute folds them in).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneEvent {
    /// TRV valve opening changed (percent, clamped on apply).
    OpeningChanged { zone: ZoneId, percent: f64 },
    /// Climate readings changed (°C).
    TemperatureChanged {
        zone: ZoneId,
        current: f64,
        target: f64,
    },
    /// External room sensor reading changed (°C). Informational only.
    ExternalTemperatureChanged { zone: ZoneId, value: f64 },
    /// Preheat deadline armed or cleared.
    PreheatWindowChanged { end: Option<DateTime<Utc>> },
    /// Master kill-switch toggled.
    EnabledChanged { enabled: bool },
}
