//! Station identity, catalog metadata and per-cycle station state

use serde::{Deserialize, Serialize};

use crate::reading::Reading;
use crate::verify::Verification;

/// WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl Coordinates {
    /// Create a new coordinate pair
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Static catalog entry for one station
///
/// Supplied by the configuration collaborator; readings and verdicts are
/// joined on top of this every evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSpec {
    /// Stable station identity
    pub id: String,
    /// Display name
    pub name: String,
    /// Geographic position
    pub coordinates: Coordinates,
    /// True for official reference monitors, false for community sensors
    pub official: bool,
    /// Anchor station id; community sensors only, officials carry `None`
    pub anchor_id: Option<String>,
}

impl StationSpec {
    /// Catalog entry for an official reference monitor
    #[must_use]
    pub fn official(id: impl Into<String>, name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
            official: true,
            anchor_id: None,
        }
    }

    /// Catalog entry for a community sensor anchored to an official station
    #[must_use]
    pub fn community(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinates: Coordinates,
        anchor_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinates,
            official: false,
            anchor_id: Some(anchor_id.into()),
        }
    }
}

/// One station's complete state for one evaluation cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Static catalog entry
    pub spec: StationSpec,
    /// Latest derived reading
    pub current: Reading,
    /// Trailing readings, oldest first, capped at
    /// [`crate::reading::HISTORY_WINDOW`]
    pub history: Vec<Reading>,
    /// Trust verdict; community sensors only, officials always carry `None`
    pub verification: Option<Verification>,
}
