//! Trust tier shared by per-sensor verification and cluster aggregation

use serde::{Deserialize, Serialize};

/// Categorical trust level assigned to a single verification or a whole cluster
///
/// Ordered so that `Low < Medium < High`, which lets callers compare and fold
/// tiers directly (e.g. taking the weakest tier across a mesh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Readings disagree with their references; treat as untrusted
    Low,
    /// Partial agreement; usable with caution
    Medium,
    /// Strong agreement across references
    High,
}

impl Tier {
    /// Display label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
