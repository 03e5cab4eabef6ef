//! Point-in-time readings and the rolling history window
//!
//! A [`RawSample`] is the wire-level input unit: a timestamp and a PM2.5
//! concentration. A [`Reading`] is the fully derived form with the coarse
//! PM10 estimate, index value and severity category filled in. Readings are
//! immutable once produced; a station owns a current reading plus a trailing
//! window of prior readings, oldest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aqi::{self, Category};

/// Fixed ratio used to derive a coarse PM10 estimate from PM2.5
///
/// Community hardware in the mesh reports PM2.5 only; PM10 is estimated for
/// display from the typical urban PM10/PM2.5 ratio.
pub const PM10_RATIO: f64 = 1.6;

/// Number of trailing readings retained per station (a day at hourly
/// resolution)
pub const HISTORY_WINDOW: usize = 25;

/// Raw sample as supplied by the transport collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Capture time
    pub timestamp: DateTime<Utc>,
    /// PM2.5 concentration in µg/m³
    pub pm2_5: f64,
}

impl RawSample {
    /// Create a new sample
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, pm2_5: f64) -> Self {
        Self { timestamp, pm2_5 }
    }
}

/// Fully derived reading for one station at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Capture time
    pub timestamp: DateTime<Utc>,
    /// PM2.5 concentration in µg/m³
    pub pm2_5: f64,
    /// Estimated PM10 concentration in µg/m³ (`pm2_5` × [`PM10_RATIO`])
    pub pm10: f64,
    /// NAQI index value
    pub aqi: u16,
    /// Severity category
    pub category: Category,
}

impl Reading {
    /// Derive a full reading from a raw sample
    #[must_use]
    pub fn from_sample(sample: &RawSample) -> Self {
        let (aqi, category) = aqi::convert(sample.pm2_5);
        Self {
            timestamp: sample.timestamp,
            pm2_5: sample.pm2_5,
            pm10: sample.pm2_5 * PM10_RATIO,
            aqi,
            category,
        }
    }
}

/// Split an oldest-first series into the current reading and its trailing
/// history window
///
/// The last reading becomes current; of the readings before it, at most
/// [`HISTORY_WINDOW`] are kept (the most recent ones, still oldest first).
/// Returns `None` for an empty series.
#[must_use]
pub fn split_current(mut readings: Vec<Reading>) -> Option<(Reading, Vec<Reading>)> {
    let current = readings.pop()?;
    if readings.len() > HISTORY_WINDOW {
        readings.drain(..readings.len() - HISTORY_WINDOW);
    }
    Some((current, readings))
}
