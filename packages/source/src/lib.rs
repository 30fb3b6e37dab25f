#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loading for the health map.
//!
//! Reads the patient CSV and the department boundary `GeoJSON` once at
//! startup into a [`DatasetContext`]. Department names on both sides are
//! normalized with the same join-key function before the context is
//! returned, so every downstream join compares like with like.

pub mod config;
pub mod context;
pub mod patients;

use std::path::PathBuf;

use health_map_geography::GeoError;

pub use config::DatasetConfig;
pub use context::DatasetContext;

/// Errors that can occur while loading the input datasets.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// An input file could not be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The patient CSV is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A patient row holds a blank or unparseable value.
    #[error("Patient CSV line {line}: invalid {column} value '{value}'")]
    InvalidValue {
        /// 1-based line of the offending record.
        line: u64,
        /// Header of the offending column.
        column: String,
        /// Raw cell contents after trimming.
        value: String,
    },

    /// The patient CSV lacks a required column.
    #[error("Patient CSV is missing required column '{column}'")]
    MissingColumn {
        /// Header name of the missing column.
        column: &'static str,
    },

    /// The boundary file is malformed.
    #[error("Boundary file {}: {source}", path.display())]
    Boundaries {
        /// Path of the boundary file.
        path: PathBuf,
        /// Underlying boundary parsing error.
        source: GeoError,
    },
}
