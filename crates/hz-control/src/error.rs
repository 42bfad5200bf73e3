//! Error types for the control engine.

use thiserror::Error;

/// Result type for control engine operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while constructing or configuring the engine.
///
/// Runtime event handling never returns an error: malformed readings and
/// unknown zone references are logged and skipped.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Two zone descriptors share the same key.
    #[error("Duplicate zone key: {key}")]
    DuplicateZone { key: String },

    /// Flow-temperature limits are inverted or non-finite.
    #[error("Invalid flow limits: min {min} must be finite and below max {max}")]
    InvalidLimits { min: f64, max: f64 },
}
