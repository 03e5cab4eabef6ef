//! Tunable decision cutoffs for verification and cluster aggregation
//!
//! Every cutoff the engine decides on is a named field here rather than a
//! literal at the decision site. Deployments have run materially different
//! values for the same cutoff (dense urban meshes tolerate less spread than
//! sparse ones), so the whole set is tunable per mesh and serializable as
//! part of host configuration.

use serde::{Deserialize, Serialize};

/// Decision cutoffs applied by [`crate::verify::verify`] and
/// [`crate::cluster::aggregate`]
///
/// All values are relative deviations (fractions, not percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Verification: both reference deviations at or below this mean a High
    /// tier verdict
    pub verify_high_deviation: f64,
    /// Verification: at least one reference deviation at or below this keeps
    /// the verdict at Medium instead of Low
    pub verify_medium_deviation: f64,
    /// Aggregation: a member deviating from the cluster mean by more than
    /// this is flagged anomalous. Looser values (up to 0.5) suit sparse
    /// meshes with natural spatial spread
    pub cluster_anomaly_deviation: f64,
    /// Aggregation: a max member deviation above this forces cluster
    /// confidence to Low
    pub cluster_low_deviation: f64,
    /// Aggregation: a max member deviation above this (but within the Low
    /// cutoff) caps cluster confidence at Medium
    pub cluster_medium_deviation: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            verify_high_deviation: 0.20,
            verify_medium_deviation: 0.50,
            cluster_anomaly_deviation: 0.35,
            cluster_low_deviation: 0.30,
            cluster_medium_deviation: 0.15,
        }
    }
}
