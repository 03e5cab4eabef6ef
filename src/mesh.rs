//! Catalog validation and whole-mesh snapshot assembly
//!
//! The [`Mesh`] owns the validated station catalog and the configured
//! thresholds. Each call to [`Mesh::evaluate`] is one complete refresh
//! cycle: every station's sample series is converted to derived readings,
//! every anchored cluster is aggregated, and every community sensor is
//! triangulated against its anchor plus a second reference. The snapshot is
//! assembled wholesale from one batch; partial results are never published.
//!
//! The second reference is abstracted as a provider closure so the engine
//! stays a pure function of its inputs. Production hosts source it from an
//! actual second reference instrument; demos and tests may synthesize one
//! from the anchor reading.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::cluster::{self, ClusterReport, MemberSample};
use crate::error::{MeshError, Result};
use crate::reading::{self, RawSample, Reading};
use crate::station::{Station, StationSpec};
use crate::thresholds::Thresholds;
use crate::verify;

/// One refresh cycle's raw input: station id → oldest-first sample series
///
/// Every cataloged station must have a non-empty series; the last sample of
/// each series is the station's current reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleBatch {
    /// Sample series keyed by station id
    pub series: BTreeMap<String, Vec<RawSample>>,
}

impl SampleBatch {
    /// Create an empty batch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a full series for one station, replacing any previous one
    pub fn insert(&mut self, id: impl Into<String>, samples: Vec<RawSample>) {
        self.series.insert(id.into(), samples);
    }

    /// Insert a single-sample series for one station
    pub fn insert_current(&mut self, id: impl Into<String>, sample: RawSample) {
        self.insert(id, vec![sample]);
    }
}

/// One complete, internally consistent evaluation cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All stations in catalog order
    pub stations: Vec<Station>,
    /// Cluster reports keyed by anchor station id
    pub clusters: BTreeMap<String, ClusterReport>,
}

impl Snapshot {
    /// Look up a station by id
    #[must_use]
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.spec.id == id)
    }
}

/// A validated station catalog plus the thresholds applied on every cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    specs: Vec<StationSpec>,
    thresholds: Thresholds,
}

impl Mesh {
    /// Validate a station catalog
    ///
    /// # Errors
    ///
    /// * `MeshError::DuplicateStation` - two entries share an id
    /// * `MeshError::AnchoredOfficial` - an official station carries an
    ///   anchor id
    /// * `MeshError::UnknownAnchor` - a community station references an id
    ///   that is not an official station
    pub fn new(specs: Vec<StationSpec>, thresholds: Thresholds) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut officials = BTreeSet::new();

        for spec in &specs {
            if !seen.insert(spec.id.as_str()) {
                return Err(MeshError::DuplicateStation(spec.id.clone()));
            }
            if spec.official {
                if spec.anchor_id.is_some() {
                    return Err(MeshError::AnchoredOfficial(spec.id.clone()));
                }
                officials.insert(spec.id.as_str());
            }
        }

        for spec in &specs {
            if let Some(anchor) = &spec.anchor_id
                && !officials.contains(anchor.as_str())
            {
                return Err(MeshError::unknown_anchor(&spec.id, anchor));
            }
        }

        Ok(Self { specs, thresholds })
    }

    /// The validated catalog, in insertion order
    #[must_use]
    pub fn specs(&self) -> &[StationSpec] {
        &self.specs
    }

    /// The thresholds applied on every cycle
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Run one full evaluation cycle over a sample batch
    ///
    /// `secondary_ref` supplies the second reference concentration for a
    /// community sensor, given its station id and its anchor's current
    /// concentration.
    ///
    /// # Errors
    ///
    /// * `MeshError::MissingSamples` - a cataloged station has no samples
    /// * `MeshError::NegativeConcentration` - a sample carries a negative
    ///   concentration
    pub fn evaluate<F>(&self, batch: &SampleBatch, mut secondary_ref: F) -> Result<Snapshot>
    where
        F: FnMut(&str, f64) -> f64,
    {
        let mut stations = Vec::with_capacity(self.specs.len());
        for spec in &self.specs {
            let series = batch
                .series
                .get(&spec.id)
                .filter(|series| !series.is_empty())
                .ok_or_else(|| MeshError::MissingSamples(spec.id.clone()))?;

            if let Some(bad) = series.iter().find(|sample| sample.pm2_5 < 0.0) {
                return Err(MeshError::negative_concentration(&spec.id, bad.pm2_5));
            }

            let readings: Vec<Reading> = series.iter().map(Reading::from_sample).collect();
            let Some((current, history)) = reading::split_current(readings) else {
                return Err(MeshError::MissingSamples(spec.id.clone()));
            };

            stations.push(Station {
                spec: spec.clone(),
                current,
                history,
                verification: None,
            });
        }

        let anchors: Vec<(String, String, f64)> = stations
            .iter()
            .filter(|s| s.spec.official)
            .map(|s| (s.spec.id.clone(), s.spec.name.clone(), s.current.pm2_5))
            .collect();

        let mut clusters = BTreeMap::new();
        for (anchor_id, anchor_name, anchor_pm2_5) in anchors {
            let member_indices: Vec<usize> = stations
                .iter()
                .enumerate()
                .filter(|(_, s)| s.spec.anchor_id.as_deref() == Some(anchor_id.as_str()))
                .map(|(i, _)| i)
                .collect();

            // An anchor with no members contributes no cluster report.
            if member_indices.is_empty() {
                continue;
            }

            let members: Vec<MemberSample> = member_indices
                .iter()
                .map(|&i| MemberSample::new(stations[i].spec.id.clone(), stations[i].current.pm2_5))
                .collect();

            let mut report = cluster::aggregate(&members, anchor_pm2_5, &self.thresholds);
            report.anchor_name = anchor_name;
            debug!(
                "cluster {anchor_id}: mean={:.1} confidence={} anomaly={}",
                report.mean_pm2_5, report.confidence, report.anomaly_detected
            );

            for &i in &member_indices {
                let station = &stations[i];
                let secondary = secondary_ref(station.spec.id.as_str(), anchor_pm2_5);
                let verdict =
                    verify::verify(station.current.pm2_5, anchor_pm2_5, secondary, &self.thresholds);
                trace!(
                    "verify {}: tier={} score={}",
                    station.spec.id, verdict.tier, verdict.confidence
                );
                stations[i].verification = Some(verdict);
            }

            clusters.insert(anchor_id, report);
        }

        Ok(Snapshot { stations, clusters })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::Tier;
    use crate::reading::HISTORY_WINDOW;
    use crate::station::Coordinates;
    use crate::verify::VerificationStatus;
    use chrono::DateTime;

    fn coords() -> Coordinates {
        Coordinates::new(28.618, 77.284)
    }

    fn two_cluster_catalog() -> Vec<StationSpec> {
        vec![
            StationSpec::official("official-md", "Mother Dairy Plant", coords()),
            StationSpec::community("mv-p1", "Phase 1 - Acharya Niketan", coords(), "official-md"),
            StationSpec::community("mv-p2", "Phase 2 - Pocket B", coords(), "official-md"),
            StationSpec::community("mv-p3", "Phase 1 - Trilokpuri Gate", coords(), "official-md"),
            StationSpec::official("official-pg", "Patparganj", coords()),
            StationSpec::community("mv-p4", "Patparganj Village", coords(), "official-pg"),
            StationSpec::community("mv-p5", "Sanjay Lake", coords(), "official-pg"),
        ]
    }

    fn batch_with(values: &[(&str, f64)]) -> SampleBatch {
        let timestamp = DateTime::from_timestamp(1_754_000_000, 0).unwrap();
        let mut batch = SampleBatch::new();
        for (id, pm) in values {
            batch.insert_current(*id, RawSample::new(timestamp, *pm));
        }
        batch
    }

    #[test]
    fn rejects_duplicate_station_ids() {
        let specs = vec![
            StationSpec::official("official-md", "Mother Dairy Plant", coords()),
            StationSpec::official("official-md", "Duplicate", coords()),
        ];
        assert_eq!(
            Mesh::new(specs, Thresholds::default()),
            Err(MeshError::DuplicateStation("official-md".into()))
        );
    }

    #[test]
    fn rejects_official_with_anchor() {
        let mut spec = StationSpec::official("official-md", "Mother Dairy Plant", coords());
        spec.anchor_id = Some("official-pg".into());
        assert_eq!(
            Mesh::new(vec![spec], Thresholds::default()),
            Err(MeshError::AnchoredOfficial("official-md".into()))
        );
    }

    #[test]
    fn rejects_unknown_or_unofficial_anchor() {
        let specs = vec![StationSpec::community("mv-p1", "Phase 1", coords(), "nowhere")];
        assert_eq!(
            Mesh::new(specs, Thresholds::default()),
            Err(MeshError::unknown_anchor("mv-p1", "nowhere"))
        );

        // Anchoring to another community sensor is just as invalid.
        let specs = vec![
            StationSpec::community("mv-p1", "Phase 1", coords(), "mv-p2"),
            StationSpec::community("mv-p2", "Phase 2", coords(), "mv-p1"),
        ];
        assert_eq!(
            Mesh::new(specs, Thresholds::default()),
            Err(MeshError::unknown_anchor("mv-p1", "mv-p2"))
        );
    }

    #[test]
    fn rejects_missing_and_negative_samples() {
        let mesh = Mesh::new(two_cluster_catalog(), Thresholds::default()).unwrap();

        let mut batch = batch_with(&[
            ("official-md", 100.0),
            ("mv-p1", 100.0),
            ("mv-p2", 100.0),
            ("mv-p3", 100.0),
            ("official-pg", 90.0),
            ("mv-p4", 90.0),
        ]);
        assert_eq!(
            mesh.evaluate(&batch, |_, anchor| anchor),
            Err(MeshError::MissingSamples("mv-p5".into()))
        );

        batch.insert("mv-p5", Vec::new());
        assert_eq!(
            mesh.evaluate(&batch, |_, anchor| anchor),
            Err(MeshError::MissingSamples("mv-p5".into()))
        );

        let timestamp = DateTime::from_timestamp(1_754_000_000, 0).unwrap();
        batch.insert_current("mv-p5", RawSample::new(timestamp, -12.0));
        assert_eq!(
            mesh.evaluate(&batch, |_, anchor| anchor),
            Err(MeshError::negative_concentration("mv-p5", -12.0))
        );
    }

    #[test]
    fn full_cycle_assembles_clusters_and_verdicts() {
        let mesh = Mesh::new(two_cluster_catalog(), Thresholds::default()).unwrap();
        let batch = batch_with(&[
            ("official-md", 100.0),
            ("mv-p1", 100.0),
            ("mv-p2", 100.0),
            ("mv-p3", 400.0),
            ("official-pg", 90.0),
            ("mv-p4", 92.0),
            ("mv-p5", 88.0),
        ]);

        let snapshot = mesh.evaluate(&batch, |_, anchor| anchor).unwrap();
        assert_eq!(snapshot.stations.len(), 7);
        assert_eq!(snapshot.clusters.len(), 2);

        // First cluster carries the 400 outlier.
        let md = &snapshot.clusters["official-md"];
        assert_eq!(md.anchor_name, "Mother Dairy Plant");
        assert_eq!(md.mean_pm2_5, 200.0);
        assert_eq!(md.confidence, Tier::Low);
        assert!(md.anomaly_detected);
        assert_eq!(md.active_members, 3);
        // The anchor is never a member of its own cluster.
        assert!(!md.members.contains_key("official-md"));

        // Second cluster agrees tightly.
        let pg = &snapshot.clusters["official-pg"];
        assert_eq!(pg.confidence, Tier::High);
        assert!(!pg.anomaly_detected);
        assert_eq!(pg.active_members, 2);

        // Officials are ground truth: no verification. Members always get one.
        for station in &snapshot.stations {
            if station.spec.official {
                assert!(station.verification.is_none());
            } else {
                assert!(station.verification.is_some());
            }
        }

        let outlier = snapshot.station("mv-p3").unwrap();
        let verdict = outlier.verification.as_ref().unwrap();
        assert_eq!(verdict.tier, Tier::Low);
        assert_eq!(verdict.status, VerificationStatus::SensorDrift);
        assert!(verdict.anomaly);

        let agreeing = snapshot.station("mv-p4").unwrap();
        let verdict = agreeing.verification.as_ref().unwrap();
        assert_eq!(verdict.tier, Tier::High);
        assert!(verdict.verified);
    }

    #[test]
    fn secondary_reference_provider_is_honored() {
        let mesh = Mesh::new(two_cluster_catalog(), Thresholds::default()).unwrap();
        let batch = batch_with(&[
            ("official-md", 100.0),
            ("mv-p1", 100.0),
            ("mv-p2", 100.0),
            ("mv-p3", 100.0),
            ("official-pg", 90.0),
            ("mv-p4", 90.0),
            ("mv-p5", 90.0),
        ]);

        // A wildly disagreeing second reference demotes everyone to Medium:
        // the primary leg still agrees.
        let snapshot = mesh.evaluate(&batch, |_, anchor| anchor * 2.0).unwrap();
        let verdict = snapshot.station("mv-p1").unwrap().verification.as_ref().unwrap();
        assert_eq!(verdict.tier, Tier::Medium);
        assert_eq!(verdict.secondary_ref, 200.0);
    }

    #[test]
    fn history_is_windowed_per_station() {
        let specs = vec![StationSpec::official("official-md", "Mother Dairy Plant", coords())];
        let mesh = Mesh::new(specs, Thresholds::default()).unwrap();

        let samples: Vec<RawSample> = (0..40)
            .map(|h| {
                let timestamp = DateTime::from_timestamp(1_754_000_000 + h * 3600, 0).unwrap();
                RawSample::new(timestamp, 60.0)
            })
            .collect();
        let mut batch = SampleBatch::new();
        batch.insert("official-md", samples);

        let snapshot = mesh.evaluate(&batch, |_, anchor| anchor).unwrap();
        let station = snapshot.station("official-md").unwrap();
        assert_eq!(station.history.len(), HISTORY_WINDOW);
        assert!(snapshot.clusters.is_empty());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let mesh = Mesh::new(two_cluster_catalog(), Thresholds::default()).unwrap();
        let batch = batch_with(&[
            ("official-md", 100.0),
            ("mv-p1", 95.0),
            ("mv-p2", 105.0),
            ("mv-p3", 100.0),
            ("official-pg", 90.0),
            ("mv-p4", 92.0),
            ("mv-p5", 88.0),
        ]);
        let snapshot = mesh.evaluate(&batch, |_, anchor| anchor).unwrap();

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["stations"][0]["spec"]["id"], "official-md");
        assert!(json["clusters"]["official-md"]["members"]["mv-p1"]["deviation"].is_number());

        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
