//! Catalog Validation Example
//!
//! Demonstrates the ingestion-boundary error handling: every malformed
//! catalog or batch shape maps to a typed `MeshError`, while the scoring
//! core itself never fails.
//!
//! Run with: cargo run --example catalog_validation

use aqmesh::{
    Coordinates, Mesh, MeshError, RawSample, SampleBatch, StationSpec, Thresholds,
};
use chrono::Utc;

fn coords() -> Coordinates {
    Coordinates::new(28.618, 77.284)
}

fn describe(result: &Result<(), MeshError>) -> String {
    match result {
        Ok(()) => "accepted".to_string(),
        Err(err) => format!("rejected: {err}"),
    }
}

fn validate(specs: Vec<StationSpec>) -> Result<(), MeshError> {
    Mesh::new(specs, Thresholds::default()).map(|_| ())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Aqmesh - Catalog Validation Example\n");

    // A well-formed two-station catalog.
    let good = vec![
        StationSpec::official("official-md", "Mother Dairy Plant", coords()),
        StationSpec::community("mv-p1", "Acharya Niketan", coords(), "official-md"),
    ];
    println!("well-formed catalog        -> {}", describe(&validate(good.clone())));

    // Duplicate station ids.
    let mut duplicated = good.clone();
    duplicated.push(StationSpec::community("mv-p1", "Shadow", coords(), "official-md"));
    println!("duplicate station id       -> {}", describe(&validate(duplicated)));

    // An official station carrying an anchor id.
    let mut anchored_official = good.clone();
    anchored_official[0].anchor_id = Some("official-pg".into());
    println!("anchored official          -> {}", describe(&validate(anchored_official)));

    // A community sensor anchored to a station that does not exist.
    let dangling = vec![StationSpec::community("mv-p9", "Orphan", coords(), "official-zz")];
    println!("unknown anchor             -> {}", describe(&validate(dangling)));

    // A community sensor anchored to another community sensor.
    let chained = vec![
        StationSpec::official("official-md", "Mother Dairy Plant", coords()),
        StationSpec::community("mv-p1", "Acharya Niketan", coords(), "official-md"),
        StationSpec::community("mv-p2", "Pocket B", coords(), "mv-p1"),
    ];
    println!("community-anchored sensor  -> {}", describe(&validate(chained)));

    // Batch-level failures: missing series and negative concentrations.
    println!();
    let mesh = Mesh::new(good, Thresholds::default())?;
    let now = Utc::now();

    let empty = SampleBatch::new();
    let result = mesh.evaluate(&empty, |_, anchor| anchor).map(|_| ());
    println!("empty batch                -> {}", describe(&result));

    let mut negative = SampleBatch::new();
    negative.insert_current("official-md", RawSample::new(now, 96.0));
    negative.insert_current("mv-p1", RawSample::new(now, -4.0));
    let result = mesh.evaluate(&negative, |_, anchor| anchor).map(|_| ());
    println!("negative concentration     -> {}", describe(&result));

    let mut complete = SampleBatch::new();
    complete.insert_current("official-md", RawSample::new(now, 96.0));
    complete.insert_current("mv-p1", RawSample::new(now, 101.0));
    let result = mesh.evaluate(&complete, |_, anchor| anchor).map(|_| ());
    println!("complete batch             -> {}", describe(&result));

    Ok(())
}
