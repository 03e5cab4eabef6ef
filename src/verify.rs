//! Triangulated per-sensor verification against two reference readings
//!
//! A community sensor is scored against two independent ground-truth values:
//! its anchor station's reading and a second corroborating reference. The
//! relative deviation against each reference drives a three-tier verdict:
//!
//! | tier   | condition                          | score                        |
//! |--------|------------------------------------|------------------------------|
//! | High   | both deviations ≤ high cutoff      | `100 − mean(Δp, Δs) × 100`   |
//! | Medium | either deviation ≤ medium cutoff   | `79 − min(Δp, Δs) × 40`      |
//! | Low    | otherwise                          | `max(10, 49 − min(Δp, Δs) × 20)` |
//!
//! A Medium verdict where the local reading sits above both references is
//! additionally flagged as a hyperlocal pollution event: the sensor is not
//! drifting, it is seeing something its references do not.

use serde::{Deserialize, Serialize};

use crate::confidence::Tier;
use crate::thresholds::Thresholds;

const HIGH_SCORE_BASE: f64 = 100.0;
const MEDIUM_SCORE_BASE: f64 = 79.0;
const MEDIUM_SCORE_SLOPE: f64 = 40.0;
const LOW_SCORE_BASE: f64 = 49.0;
const LOW_SCORE_SLOPE: f64 = 20.0;
const LOW_SCORE_FLOOR: f64 = 10.0;

/// Narrative status tag attached to a verification verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// High tier: the reading agrees with both references
    VerifiedTruth,
    /// Medium tier with the local reading above both references
    LocalizedSpike,
    /// Medium tier: partial agreement, ordinary spatial spread
    ModerateVariance,
    /// Low tier: the reading disagrees with both references
    SensorDrift,
}

impl VerificationStatus {
    /// Narrative message as shown to end users
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::VerifiedTruth => "Verified Air Quality Truth",
            Self::LocalizedSpike => "Localized Pollution Spike detected",
            Self::ModerateVariance => "Moderate Spatial Variance",
            Self::SensorDrift => "Sensor Drift or High Local Interference",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of triangulating one sensor against its two references
///
/// Produced fresh every evaluation cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    /// The sensor's own concentration (µg/m³)
    pub local: f64,
    /// Primary reference concentration, normally the anchor station
    pub primary_ref: f64,
    /// Second corroborating reference concentration
    pub secondary_ref: f64,
    /// True iff the tier is above Low
    pub verified: bool,
    /// Confidence score in [10, 100]
    pub confidence: u8,
    /// Trust tier
    pub tier: Tier,
    /// Narrative status tag
    pub status: VerificationStatus,
    /// True iff the tier is Low
    pub anomaly: bool,
    /// True for a Medium verdict where the local reading exceeds both
    /// references
    pub hyperlocal_spike: bool,
}

/// Relative deviation of a local reading from a reference
///
/// A zero reference is floored to 1 before dividing. That floor is a
/// division guard, not a calibration: a dead reference still yields a large
/// deviation for any non-trivial local reading.
fn relative_deviation(local: f64, reference: f64) -> f64 {
    let divisor = if reference == 0.0 { 1.0 } else { reference };
    (local - reference).abs() / divisor
}

/// Score one sensor against its two reference readings
///
/// Pure function of the three concentrations and the configured cutoffs:
/// always produces a verdict, including for degenerate (zero) references.
///
/// # Example
///
/// ```rust
/// use aqmesh::confidence::Tier;
/// use aqmesh::thresholds::Thresholds;
/// use aqmesh::verify::verify;
///
/// let v = verify(104.0, 100.0, 102.0, &Thresholds::default());
/// assert_eq!(v.tier, Tier::High);
/// assert!(v.verified);
/// ```
#[must_use]
pub fn verify(local: f64, primary_ref: f64, secondary_ref: f64, thresholds: &Thresholds) -> Verification {
    let delta_p = relative_deviation(local, primary_ref);
    let delta_s = relative_deviation(local, secondary_ref);
    let min_delta = delta_p.min(delta_s);

    let (tier, score, status, hyperlocal_spike) = if delta_p <= thresholds.verify_high_deviation
        && delta_s <= thresholds.verify_high_deviation
    {
        let score = HIGH_SCORE_BASE - (delta_p + delta_s) / 2.0 * 100.0;
        (Tier::High, score, VerificationStatus::VerifiedTruth, false)
    } else if min_delta <= thresholds.verify_medium_deviation {
        let score = MEDIUM_SCORE_BASE - min_delta * MEDIUM_SCORE_SLOPE;
        let spike = local > primary_ref && local > secondary_ref;
        let status = if spike {
            VerificationStatus::LocalizedSpike
        } else {
            VerificationStatus::ModerateVariance
        };
        (Tier::Medium, score, status, spike)
    } else {
        let score = (LOW_SCORE_BASE - min_delta * LOW_SCORE_SLOPE).max(LOW_SCORE_FLOOR);
        (Tier::Low, score, VerificationStatus::SensorDrift, false)
    };

    Verification {
        local,
        primary_ref,
        secondary_ref,
        verified: tier != Tier::Low,
        confidence: score.round() as u8,
        tier,
        status,
        anomaly: tier == Tier::Low,
        hyperlocal_spike,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_debug_snapshot;
    use rstest::rstest;

    #[rstest]
    #[case(80.0, Tier::High)]
    #[case(0.5, Tier::High)]
    #[case(412.0, Tier::High)]
    fn identical_readings_score_perfect(#[case] pm: f64, #[case] tier: Tier) {
        let v = verify(pm, pm, pm, &Thresholds::default());
        assert_eq!(v.tier, tier);
        assert_eq!(v.confidence, 100);
        assert_eq!(v.status, VerificationStatus::VerifiedTruth);
        assert!(v.verified);
        assert!(!v.anomaly);
        assert!(!v.hyperlocal_spike);
    }

    #[rstest]
    // Both deviations at the High cutoff exactly.
    #[case(120.0, 100.0, 100.0, Tier::High, 80, VerificationStatus::VerifiedTruth)]
    // Mild disagreement with one reference only.
    #[case(110.0, 100.0, 150.0, Tier::Medium, 75, VerificationStatus::ModerateVariance)]
    // Local above both references: hyperlocal event.
    #[case(140.0, 100.0, 105.0, Tier::Medium, 66, VerificationStatus::LocalizedSpike)]
    // Local below both references is ordinary variance, never a spike.
    #[case(70.0, 100.0, 105.0, Tier::Medium, 67, VerificationStatus::ModerateVariance)]
    // Both deviations at the Medium cutoff exactly.
    #[case(150.0, 100.0, 100.0, Tier::Medium, 59, VerificationStatus::LocalizedSpike)]
    // Far from both references.
    #[case(300.0, 100.0, 110.0, Tier::Low, 14, VerificationStatus::SensorDrift)]
    // Extreme disagreement bottoms out at the score floor.
    #[case(1000.0, 10.0, 10.0, Tier::Low, 10, VerificationStatus::SensorDrift)]
    fn tier_decision_cases(
        #[case] local: f64,
        #[case] primary: f64,
        #[case] secondary: f64,
        #[case] tier: Tier,
        #[case] confidence: u8,
        #[case] status: VerificationStatus,
    ) {
        let v = verify(local, primary, secondary, &Thresholds::default());
        assert_eq!(v.tier, tier);
        assert_eq!(v.confidence, confidence);
        assert_eq!(v.status, status);
        assert_eq!(v.verified, tier != Tier::Low);
        assert_eq!(v.anomaly, tier == Tier::Low);
    }

    #[rstest]
    #[case(VerificationStatus::VerifiedTruth, "Verified Air Quality Truth")]
    #[case(VerificationStatus::LocalizedSpike, "Localized Pollution Spike detected")]
    #[case(VerificationStatus::ModerateVariance, "Moderate Spatial Variance")]
    #[case(VerificationStatus::SensorDrift, "Sensor Drift or High Local Interference")]
    fn narrative_messages(#[case] status: VerificationStatus, #[case] message: &str) {
        assert_eq!(status.message(), message);
        assert_eq!(status.to_string(), message);
    }

    #[test]
    fn zero_references_still_produce_a_verdict() {
        let v = verify(50.0, 0.0, 0.0, &Thresholds::default());
        assert_eq!(v.tier, Tier::Low);
        assert_eq!(v.confidence, 10);
        assert_eq!(v.status, VerificationStatus::SensorDrift);
        assert!(v.anomaly);

        // A zero local against zero references deviates by zero.
        let v = verify(0.0, 0.0, 0.0, &Thresholds::default());
        assert_eq!(v.tier, Tier::High);
        assert_eq!(v.confidence, 100);
    }

    #[test]
    fn custom_thresholds_shift_the_cutoffs() {
        let strict = Thresholds {
            verify_high_deviation: 0.05,
            ..Thresholds::default()
        };
        // 10% off the primary: High under defaults, Medium under strict.
        let v = verify(110.0, 100.0, 110.0, &Thresholds::default());
        assert_eq!(v.tier, Tier::High);
        let v = verify(110.0, 100.0, 110.0, &strict);
        assert_eq!(v.tier, Tier::Medium);
    }

    #[test]
    fn full_verdict_snapshot() {
        let v = verify(120.0, 100.0, 100.0, &Thresholds::default());
        assert_debug_snapshot!(v, @r"
        Verification {
            local: 120.0,
            primary_ref: 100.0,
            secondary_ref: 100.0,
            verified: true,
            confidence: 80,
            tier: High,
            status: VerifiedTruth,
            anomaly: false,
            hyperlocal_spike: false,
        }
        ");
    }
}
