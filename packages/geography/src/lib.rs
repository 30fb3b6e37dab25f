#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Department boundary loading and the boundary-preserving geo-join.
//!
//! Reads department polygons from a `GeoJSON` `FeatureCollection`, normalizes
//! their names with the same [`normalize::department_key`] applied to patient
//! rows, and left-joins aggregated metrics onto them so that every boundary
//! is rendered exactly once.

pub mod boundaries;
pub mod join;
pub mod normalize;

use thiserror::Error;

pub use boundaries::{Boundary, BoundarySet};
pub use join::{JoinIntegrityError, JoinReport, JoinedRegion, SpatialMetrics, join};

/// Errors that can occur while loading department boundaries.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Reading the boundary source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The top-level `GeoJSON` object is not a `FeatureCollection`.
    #[error("Expected a GeoJSON FeatureCollection, found {found}")]
    NotFeatureCollection {
        /// Kind of object that was found instead.
        found: &'static str,
    },

    /// A feature lacks the department-name property.
    #[error("Feature {index} has no string property '{property}'")]
    MissingProperty {
        /// Position of the feature in the collection.
        index: usize,
        /// Name of the expected property.
        property: String,
    },

    /// A feature's geometry is absent or not a (multi)polygon.
    #[error("Feature '{name}' has unsupported geometry: {found}")]
    UnsupportedGeometry {
        /// Department name of the offending feature.
        name: String,
        /// Description of the geometry that was found.
        found: String,
    },
}
