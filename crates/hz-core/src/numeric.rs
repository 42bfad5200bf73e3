use crate::HzError;

/// Clamp a valve opening to the physical 0..100 % range.
///
/// Silent and idempotent: out-of-range sensor readings are narrowed, never
/// rejected.
pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Clamp a normalized quantity to [0, 1].
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, HzError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HzError::NonFinite { what, value: v })
    }
}
