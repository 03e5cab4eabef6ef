//! Cluster-level aggregation of community sensors around one anchor
//!
//! All community sensors anchored to the same official station form a
//! cluster. The aggregator computes the cluster's mean concentration,
//! per-member deviation and anomaly flags, an overall confidence tier, and a
//! calibration factor expressing how far the community mean drifts from the
//! official anchor reading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence::Tier;
use crate::thresholds::Thresholds;

/// Minimum number of active members for a cluster verdict above Low
///
/// A single sensor cannot corroborate itself, so its cluster is always Low
/// confidence regardless of deviation.
pub const MIN_ACTIVE_MEMBERS: usize = 2;

/// One member's current concentration as seen by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSample {
    /// Station id of the member sensor
    pub id: String,
    /// Current PM2.5 concentration in µg/m³
    pub pm2_5: f64,
}

impl MemberSample {
    /// Create a new member sample
    #[must_use]
    pub fn new(id: impl Into<String>, pm2_5: f64) -> Self {
        Self { id: id.into(), pm2_5 }
    }
}

/// Per-member deviation verdict within a cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberStatus {
    /// Relative deviation from the cluster mean
    pub deviation: f64,
    /// True iff the deviation exceeds the configured anomaly cutoff
    pub anomaly: bool,
}

/// Aggregate verdict over one anchor's member sensors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    /// Display name of the anchor station (filled in by the orchestrator)
    pub anchor_name: String,
    /// Arithmetic mean of active members' concentrations (µg/m³)
    pub mean_pm2_5: f64,
    /// Overall cluster confidence tier
    pub confidence: Tier,
    /// True iff any member is flagged anomalous
    pub anomaly_detected: bool,
    /// Number of members with a strictly positive concentration
    pub active_members: usize,
    /// Anchor concentration divided by the member mean; display-only
    pub calibration_factor: f64,
    /// Per-member deviation verdicts, keyed by station id
    pub members: BTreeMap<String, MemberStatus>,
}

/// Aggregate a cluster of member sensors against their anchor's concentration
///
/// Members with a non-positive concentration are treated as inactive and
/// excluded. An empty active set yields the defined degenerate report (zero
/// mean, Low confidence, calibration factor 1) rather than an error. The
/// anchor itself is never part of `members`; the orchestrator fills in
/// `anchor_name` after this returns.
#[must_use]
pub fn aggregate(
    members: &[MemberSample],
    anchor_pm2_5: f64,
    thresholds: &Thresholds,
) -> ClusterReport {
    let active: Vec<&MemberSample> = members.iter().filter(|m| m.pm2_5 > 0.0).collect();

    if active.is_empty() {
        return ClusterReport {
            anchor_name: String::new(),
            mean_pm2_5: 0.0,
            confidence: Tier::Low,
            anomaly_detected: false,
            active_members: 0,
            calibration_factor: 1.0,
            members: BTreeMap::new(),
        };
    }

    let mean_pm2_5 = active.iter().map(|m| m.pm2_5).sum::<f64>() / active.len() as f64;

    let mut member_map = BTreeMap::new();
    let mut anomaly_detected = false;
    let mut max_deviation = 0.0_f64;

    for member in &active {
        let deviation = (member.pm2_5 - mean_pm2_5).abs() / mean_pm2_5;
        let anomaly = deviation > thresholds.cluster_anomaly_deviation;
        anomaly_detected |= anomaly;
        max_deviation = max_deviation.max(deviation);
        member_map.insert(member.id.clone(), MemberStatus { deviation, anomaly });
    }

    let confidence = if active.len() < MIN_ACTIVE_MEMBERS
        || max_deviation > thresholds.cluster_low_deviation
    {
        Tier::Low
    } else if max_deviation > thresholds.cluster_medium_deviation {
        Tier::Medium
    } else {
        Tier::High
    };

    // The active mean is strictly positive; the floor only matters on the
    // degenerate path above, but the published formula keeps it.
    let divisor = if mean_pm2_5 == 0.0 { 1.0 } else { mean_pm2_5 };
    let calibration_factor = anchor_pm2_5 / divisor;

    ClusterReport {
        anchor_name: String::new(),
        mean_pm2_5,
        confidence,
        anomaly_detected,
        active_members: active.len(),
        calibration_factor,
        members: member_map,
    }
}
