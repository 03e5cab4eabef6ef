//! Air-Quality Mesh Trust Engine
//!
//! This crate scores a hybrid mesh of official reference monitors and
//! community sensors arranged in geographic clusters:
//! - NAQI index conversion for every reading ([`aqi`])
//! - cluster-level aggregation with anomaly flagging ([`cluster`])
//! - triangulated per-sensor verification against two references ([`verify`])
//! - whole-mesh snapshot assembly with catalog validation ([`mesh`])
//!
//! The engine is a pure, synchronous library: every cycle is a function of
//! the supplied sample batch, and the core scoring functions never fail.
//!
//! # Example
//!
//! ```rust
//! use aqmesh::{Coordinates, Mesh, RawSample, SampleBatch, StationSpec, Thresholds, Tier};
//! use chrono::DateTime;
//!
//! let specs = vec![
//!     StationSpec::official("official-md", "Mother Dairy Plant", Coordinates::new(28.618, 77.284)),
//!     StationSpec::community("mv-p1", "Acharya Niketan", Coordinates::new(28.612, 77.278), "official-md"),
//!     StationSpec::community("mv-p2", "Pocket B", Coordinates::new(28.624, 77.278), "official-md"),
//! ];
//! let mesh = Mesh::new(specs, Thresholds::default()).unwrap();
//!
//! let timestamp = DateTime::from_timestamp(1_754_000_000, 0).unwrap();
//! let mut batch = SampleBatch::new();
//! batch.insert_current("official-md", RawSample::new(timestamp, 96.0));
//! batch.insert_current("mv-p1", RawSample::new(timestamp, 101.0));
//! batch.insert_current("mv-p2", RawSample::new(timestamp, 94.0));
//!
//! // The second reference would come from a real corroborating instrument.
//! let snapshot = mesh.evaluate(&batch, |_, anchor_pm| anchor_pm).unwrap();
//!
//! assert_eq!(snapshot.clusters["official-md"].confidence, Tier::High);
//! assert!(snapshot.station("mv-p1").unwrap().verification.as_ref().unwrap().verified);
//! ```

pub mod aqi;
pub mod cluster;
pub mod confidence;
pub mod error;
pub mod mesh;
pub mod reading;
pub mod station;
pub mod thresholds;
pub mod verify;

pub use aqi::{Category, convert};
pub use cluster::{ClusterReport, MemberSample, MemberStatus, aggregate};
pub use confidence::Tier;
pub use error::{MeshError, Result};
pub use mesh::{Mesh, SampleBatch, Snapshot};
pub use reading::{HISTORY_WINDOW, PM10_RATIO, RawSample, Reading};
pub use station::{Coordinates, Station, StationSpec};
pub use thresholds::Thresholds;
pub use verify::{Verification, VerificationStatus, verify};

/// Validate a catalog and run a single evaluation cycle in one call
///
/// Convenience wrapper for hosts that rebuild the catalog every cycle; keep
/// a [`Mesh`] around instead when the catalog is static.
///
/// # Errors
///
/// Any catalog validation or ingestion error from [`Mesh::new`] and
/// [`Mesh::evaluate`].
pub fn evaluate<F>(
    specs: Vec<StationSpec>,
    thresholds: Thresholds,
    batch: &SampleBatch,
    secondary_ref: F,
) -> Result<Snapshot>
where
    F: FnMut(&str, f64) -> f64,
{
    Mesh::new(specs, thresholds)?.evaluate(batch, secondary_ref)
}
