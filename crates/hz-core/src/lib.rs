//! hz-core: stable foundation for hydrozone.
//!
//! Contains:
//! - ids (compact zone identifiers)
//! - numeric (clamp + finiteness helpers shared by every layer)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HzError, HzResult};
pub use ids::*;
pub use numeric::*;
