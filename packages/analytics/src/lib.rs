#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory analytics over the loaded patient records.
//!
//! The [`filter`] and [`aggregate`] stages feed the choropleth pipeline;
//! [`descriptive`] computes the per-diagnosis summaries and chart series
//! shown next to the map. Everything here is a pure function of its input.

pub mod aggregate;
pub mod descriptive;
pub mod filter;

pub use aggregate::aggregate;
pub use filter::{filter, selector_options};
