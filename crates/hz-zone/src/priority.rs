//! Zone priority tiers.

use serde::{Deserialize, Serialize};

/// Priority tier controlling how eagerly a zone alone can trigger the shared
/// heat source.
///
/// Deliberately a two-variant enum: earlier design iterations carried a
/// continuous weight here, but the tiers are discrete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can trigger the boiler on its own at any valve opening.
    High,
    /// Triggers alone only at full opening, or jointly with other low-tier
    /// zones by aggregate opening.
    Low,
}

impl Priority {
    pub fn is_high(self) -> bool {
        matches!(self, Priority::High)
    }
}
