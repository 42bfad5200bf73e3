//! Physical flow-temperature limits for the shared heat source.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Default minimum flow temperature when the boiler is running (°C).
pub const DEFAULT_MIN_FLOW_TEMP: f64 = 5.0;

/// Default maximum boiler output (safety limit, °C).
pub const DEFAULT_MAX_FLOW_TEMP: f64 = 80.0;

/// Safe flow-temperature band for the boiler.
///
/// Every commanded value is clamped into this band, with one deliberate
/// exception: "boiler off" is commanded as `0.0` and bypasses the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowLimits {
    /// Minimum flow temperature while running (°C).
    pub min: f64,
    /// Maximum flow temperature (°C).
    pub max: f64,
}

impl FlowLimits {
    /// Create a new limit band.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is non-finite or `min >= max`.
    pub fn new(min: f64, max: f64) -> ControlResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ControlError::InvalidLimits { min, max });
        }
        Ok(Self { min, max })
    }

    /// Clamp a flow temperature into the band.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Width of the band (°C).
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for FlowLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_FLOW_TEMP,
            max: DEFAULT_MAX_FLOW_TEMP,
        }
    }
}
