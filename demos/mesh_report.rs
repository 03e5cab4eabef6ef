//! Mesh Report Example
//!
//! Seeds a two-cluster community mesh around the Mayur Vihar official
//! stations, runs one evaluation cycle and prints the resulting cluster
//! reports and per-sensor trust verdicts.
//!
//! Run with: cargo run --example mesh_report

use aqmesh::{
    Coordinates, Mesh, RawSample, SampleBatch, Snapshot, StationSpec, Thresholds,
};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Hours of trailing samples seeded per station (history window + current)
const SERIES_HOURS: i64 = 26;

fn catalog() -> Vec<StationSpec> {
    vec![
        // Cluster 1: enveloping the Mother Dairy Plant official monitor
        StationSpec::official(
            "official-md",
            "Mother Dairy Plant (Official Core)",
            Coordinates::new(28.6180, 77.2840),
        ),
        StationSpec::community(
            "mv-p1",
            "Phase 1 - Acharya Niketan (SW Node)",
            Coordinates::new(28.6120, 77.2780),
            "official-md",
        ),
        StationSpec::community(
            "mv-p2",
            "Phase 2 - Pocket B (NW Node)",
            Coordinates::new(28.6240, 77.2780),
            "official-md",
        ),
        StationSpec::community(
            "mv-p3",
            "Phase 1 - Trilokpuri Gate (NE Node)",
            Coordinates::new(28.6240, 77.2900),
            "official-md",
        ),
        StationSpec::community(
            "mv-p7",
            "Phase 1 - Pocket 4 (SE Node)",
            Coordinates::new(28.6120, 77.2900),
            "official-md",
        ),
        // Cluster 2: enveloping the Patparganj official monitor
        StationSpec::official(
            "official-pg",
            "Patparganj (Official Core)",
            Coordinates::new(28.6235, 77.2913),
        ),
        StationSpec::community(
            "mv-p4",
            "Patparganj Village (NW Node)",
            Coordinates::new(28.6280, 77.2850),
            "official-pg",
        ),
        StationSpec::community(
            "mv-p5",
            "Sanjay Lake (NE Node)",
            Coordinates::new(28.6280, 77.2980),
            "official-pg",
        ),
        StationSpec::community(
            "mv-p6",
            "Phase 2 - Main Market (SE Node)",
            Coordinates::new(28.6190, 77.2980),
            "official-pg",
        ),
        StationSpec::community(
            "mv-p8",
            "IP Extension (SW Node)",
            Coordinates::new(28.6190, 77.2850),
            "official-pg",
        ),
    ]
}

/// Seed an hourly sample series around a base concentration
fn seed_series(rng: &mut StdRng, base_pm: f64) -> Vec<RawSample> {
    let now = Utc::now();
    (0..SERIES_HOURS)
        .rev()
        .map(|hours_ago| {
            let variation = (rng.gen_range(0.0..1.0) - 0.5) * 15.0;
            let pm2_5 = (base_pm + variation).max(5.0);
            RawSample::new(now - Duration::hours(hours_ago), pm2_5)
        })
        .collect()
}

fn print_report(snapshot: &Snapshot) {
    for (anchor_id, cluster) in &snapshot.clusters {
        println!("🛰️  {} mesh cluster", cluster.anchor_name);
        println!(
            "   mean PM2.5 {:>6.1} µg/m³ | confidence {:<6} | calibration ×{:.2} | anomaly: {}",
            cluster.mean_pm2_5,
            cluster.confidence.label(),
            cluster.calibration_factor,
            if cluster.anomaly_detected { "yes" } else { "no" }
        );

        for station in &snapshot.stations {
            if station.spec.anchor_id.as_deref() != Some(anchor_id.as_str()) {
                continue;
            }
            let reading = &station.current;
            let info = reading.category.info();
            print!(
                "   {:<38} AQI {:>3} ({:<12})",
                station.spec.name,
                reading.aqi,
                info.label
            );
            if let Some(member) = cluster.members.get(&station.spec.id) {
                print!(" deviation {:>5.1}%", member.deviation * 100.0);
            }
            if let Some(verdict) = &station.verification {
                print!(
                    " | {:>3}% {}",
                    verdict.confidence,
                    verdict.status.message()
                );
            }
            println!();
        }
        println!();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🌫️  Aqmesh - Mesh Report Example\n");

    // Seeded so the report is reproducible from run to run.
    let mut rng = StdRng::seed_from_u64(31);
    let specs = catalog();
    let mesh = Mesh::new(specs, Thresholds::default())?;

    let mut batch = SampleBatch::new();
    for spec in mesh.specs() {
        let base_pm = if spec.official {
            85.0 + rng.gen_range(0.0..30.0)
        } else {
            95.0 + rng.gen_range(0.0..50.0)
        };
        batch.insert(spec.id.clone(), seed_series(&mut rng, base_pm));
    }

    // Stand-in for a second reference instrument: the anchor reading
    // perturbed by ±5%. A deployment would supply real telemetry here.
    let mut secondary_rng = StdRng::seed_from_u64(97);
    let snapshot = mesh.evaluate(&batch, |_, anchor_pm| {
        anchor_pm * secondary_rng.gen_range(0.95..=1.05)
    })?;

    print_report(&snapshot);

    let verified = snapshot
        .stations
        .iter()
        .filter_map(|s| s.verification.as_ref())
        .filter(|v| v.verified)
        .count();
    let community = snapshot.stations.iter().filter(|s| !s.spec.official).count();
    println!("✅ {verified}/{community} community sensors verified");

    Ok(())
}
