//! Error types for catalog validation and sample ingestion
//!
//! The scoring core itself is total: conversion, verification and cluster
//! aggregation have a defined result for every input. Errors can only arise
//! at the ingestion boundary, where a station catalog or a sample batch may
//! be malformed.

use thiserror::Error;

/// Result type alias for mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while validating a station catalog or a sample batch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Two catalog entries share the same station id
    #[error("Duplicate station id: {0}")]
    DuplicateStation(String),

    /// A community station references an anchor that is not an official station
    #[error("Station {station} references unknown anchor: {anchor}")]
    UnknownAnchor { station: String, anchor: String },

    /// An official station carries an anchor id (officials are the ground truth)
    #[error("Official station {0} must not carry an anchor id")]
    AnchoredOfficial(String),

    /// A cataloged station has no samples in the batch
    #[error("No samples supplied for station: {0}")]
    MissingSamples(String),

    /// A sample carries a negative concentration
    #[error("Negative concentration for station {station}: {value}")]
    NegativeConcentration { station: String, value: f64 },
}

impl MeshError {
    /// Create a new `UnknownAnchor` error
    #[must_use]
    pub fn unknown_anchor(station: &str, anchor: &str) -> Self {
        Self::UnknownAnchor {
            station: station.to_string(),
            anchor: anchor.to_string(),
        }
    }

    /// Create a new `NegativeConcentration` error
    #[must_use]
    pub fn negative_concentration(station: &str, value: f64) -> Self {
        Self::NegativeConcentration {
            station: station.to_string(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::DuplicateStation("mv-p1".into());
        assert_eq!(err.to_string(), "Duplicate station id: mv-p1");

        let err = MeshError::unknown_anchor("mv-p4", "official-xx");
        assert_eq!(
            err.to_string(),
            "Station mv-p4 references unknown anchor: official-xx"
        );

        let err = MeshError::negative_concentration("mv-p2", -3.5);
        assert_eq!(
            err.to_string(),
            "Negative concentration for station mv-p2: -3.5"
        );
    }

    #[test]
    fn test_error_equality() {
        let err1 = MeshError::MissingSamples("official-md".into());
        let err2 = MeshError::MissingSamples("official-md".into());
        let err3 = MeshError::MissingSamples("official-pg".into());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
