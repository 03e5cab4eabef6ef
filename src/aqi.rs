//! Indian NAQI index conversion for PM2.5
//!
//! This module implements the National Air Quality Index mapping from a raw
//! PM2.5 concentration (µg/m³) to a bounded index value and a discrete
//! severity category, based on the CPCB breakpoint scale:
//! <https://cpcb.nic.in/National-Air-Quality-Index/>
//!
//! The table rows are contiguous and half-open (`min <= c < max`), so every
//! non-negative concentration lands in exactly one row; the final row is
//! unbounded above and saturates at its index ceiling.

use serde::{Deserialize, Serialize};

/// Discrete severity category associated with an index range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// 0-50: minimal impact
    Good,
    /// 51-100: minor breathing discomfort to sensitive people
    Satisfactory,
    /// 101-200: breathing discomfort with lung, asthma and heart conditions
    Moderate,
    /// 201-300: breathing discomfort to most people on prolonged exposure
    Poor,
    /// 301-400: respiratory illness on prolonged exposure
    VeryPoor,
    /// 401-500: affects healthy people, serious impact on existing diseases
    Severe,
}

impl Category {
    /// Human-readable label as shown to end users
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.info().label
    }

    /// Static presentation metadata for this category
    #[must_use]
    pub fn info(&self) -> &'static CategoryInfo {
        match self {
            Self::Good => &CATEGORY_INFO[0],
            Self::Satisfactory => &CATEGORY_INFO[1],
            Self::Moderate => &CATEGORY_INFO[2],
            Self::Poor => &CATEGORY_INFO[3],
            Self::VeryPoor => &CATEGORY_INFO[4],
            Self::Severe => &CATEGORY_INFO[5],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation metadata for a category
///
/// Consumed by map/detail views and advisory generators; the engine itself
/// only ever emits the [`Category`] identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Display label
    pub label: &'static str,
    /// Health-impact description
    pub description: &'static str,
    /// Display color as a hex RGB string
    pub color: &'static str,
}

/// One row of the NAQI breakpoint table
///
/// Concentration membership is half-open: a concentration `c` belongs to this
/// row iff `min_pm2_5 <= c < max_pm2_5`. The last table row additionally
/// claims everything at or above its lower bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Severity category emitted for this row
    pub category: Category,
    /// Inclusive concentration lower bound (µg/m³)
    pub min_pm2_5: f64,
    /// Exclusive concentration upper bound (µg/m³)
    pub max_pm2_5: f64,
    /// Index value at the lower bound
    pub min_index: u16,
    /// Index value approached at the upper bound
    pub max_index: u16,
}

/// The fixed, ascending NAQI PM2.5 breakpoint table
pub const BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint {
        category: Category::Good,
        min_pm2_5: 0.0,
        max_pm2_5: 30.0,
        min_index: 0,
        max_index: 50,
    },
    Breakpoint {
        category: Category::Satisfactory,
        min_pm2_5: 30.0,
        max_pm2_5: 60.0,
        min_index: 51,
        max_index: 100,
    },
    Breakpoint {
        category: Category::Moderate,
        min_pm2_5: 60.0,
        max_pm2_5: 90.0,
        min_index: 101,
        max_index: 200,
    },
    Breakpoint {
        category: Category::Poor,
        min_pm2_5: 90.0,
        max_pm2_5: 120.0,
        min_index: 201,
        max_index: 300,
    },
    Breakpoint {
        category: Category::VeryPoor,
        min_pm2_5: 120.0,
        max_pm2_5: 250.0,
        min_index: 301,
        max_index: 400,
    },
    Breakpoint {
        category: Category::Severe,
        min_pm2_5: 250.0,
        max_pm2_5: 999.0,
        min_index: 401,
        max_index: 500,
    },
];

const CATEGORY_INFO: [CategoryInfo; 6] = [
    CategoryInfo {
        label: "Good",
        description: "Minimal impact",
        color: "#22c55e",
    },
    CategoryInfo {
        label: "Satisfactory",
        description: "Minor breathing discomfort to sensitive people",
        color: "#4ade80",
    },
    CategoryInfo {
        label: "Moderate",
        description: "Breathing discomfort to people with lungs, asthma and heart diseases",
        color: "#facc15",
    },
    CategoryInfo {
        label: "Poor",
        description: "Breathing discomfort to most people on prolonged exposure",
        color: "#f97316",
    },
    CategoryInfo {
        label: "Very Poor",
        description: "Respiratory illness on prolonged exposure",
        color: "#ef4444",
    },
    CategoryInfo {
        label: "Severe",
        description: "Affects healthy people and seriously impacts those with existing diseases",
        color: "#7f1d1d",
    },
];

/// Convert a PM2.5 concentration to an index value and severity category
///
/// Locates the breakpoint row containing the concentration and linearly
/// interpolates the index within it, rounding to the nearest integer.
/// Concentrations beyond the final row's nominal ceiling saturate at the
/// table maximum. Callers must not pass negative concentrations; the
/// ingestion boundary rejects them before they reach this function.
///
/// # Example
///
/// ```rust
/// use aqmesh::aqi::{Category, convert};
///
/// let (index, category) = convert(85.0);
/// assert_eq!(index, 184);
/// assert_eq!(category, Category::Moderate);
/// ```
#[must_use]
pub fn convert(pm2_5: f64) -> (u16, Category) {
    let bp = BREAKPOINTS
        .iter()
        .find(|bp| pm2_5 >= bp.min_pm2_5 && pm2_5 < bp.max_pm2_5)
        .unwrap_or(&BREAKPOINTS[BREAKPOINTS.len() - 1]);

    let scale = f64::from(bp.max_index - bp.min_index) / (bp.max_pm2_5 - bp.min_pm2_5);
    let index = f64::from(bp.min_index) + scale * (pm2_5 - bp.min_pm2_5);
    let index = index
        .round()
        .clamp(f64::from(bp.min_index), f64::from(bp.max_index));

    (index as u16, bp.category)
}
