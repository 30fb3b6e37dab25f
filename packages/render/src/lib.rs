#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth rendering for joined department metrics.
//!
//! Turns the geo-join output into a [`MapView`]: a choropleth layer colored
//! by the selected metric's palette, a transparent hover layer exposing all
//! metrics, and a legend, composed on a base map centered on a fixed
//! coordinate. The view serializes to JSON or to a self-contained Leaflet
//! page with client-side pan and zoom.

pub mod html;
pub mod layers;
pub mod scale;

use geojson::FeatureCollection;
use health_map_geography::SpatialMetrics;
use health_map_geography_models::RegionStats;
use health_map_patient_models::{Metric, Palette, Selector};
use serde::Serialize;

use crate::scale::ColorScale;

/// Initial map center (latitude, longitude): Colombia's approximate centroid.
pub const MAP_CENTER: [f64; 2] = [4.5709, -74.2973];

/// Initial zoom level.
pub const MAP_ZOOM: u8 = 5;

/// Base map tile layer name.
pub const MAP_TILES: &str = "CartoDB positron";

/// Legend shown next to the choropleth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    /// Metric display label.
    pub title: String,
    /// Color bins over the present values.
    pub scale: ColorScale,
}

/// A fully rendered, interactive map for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Heading shown above the map.
    pub title: String,
    /// Initial center as `[latitude, longitude]`.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Base map tile layer name.
    pub tiles: &'static str,
    /// Metric driving the fill.
    pub metric: Metric,
    /// Palette used for the fill.
    pub palette: Palette,
    /// Legend for the fill colors.
    pub legend: Legend,
    /// Filled boundaries.
    pub choropleth: FeatureCollection,
    /// Transparent hover layer.
    pub tooltips: FeatureCollection,
    /// Per-region statistics without geometry.
    pub regions: Vec<RegionStats>,
    /// `true` when no region has data for this selection.
    pub empty: bool,
}

/// Builds the heading for a selection.
#[must_use]
pub fn title(diagnosis: &Selector, gender: &Selector, metric: Metric) -> String {
    format!(
        "Distribución de pacientes ({diagnosis}, {gender}) - {}",
        metric.label()
    )
}

/// Renders joined metrics into a map colored by `metric`.
#[must_use]
pub fn render(spatial: &SpatialMetrics<'_>, metric: Metric) -> MapView {
    let palette = metric.palette();
    let scale = ColorScale::new(palette, spatial.regions.iter().map(|r| r.value(metric)));
    log::debug!(
        "Rendering {} regions by {metric} over {:?}..{:?}",
        spatial.regions.len(),
        scale.min,
        scale.max
    );

    MapView {
        title: metric.label().to_string(),
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        tiles: MAP_TILES,
        metric,
        palette,
        choropleth: layers::choropleth(&spatial.regions, metric, &scale),
        tooltips: layers::tooltips(&spatial.regions),
        legend: Legend {
            title: metric.label().to_string(),
            scale,
        },
        regions: spatial.regions.iter().map(|r| r.stats()).collect(),
        empty: spatial.is_empty(),
    }
}

impl MapView {
    /// Replaces the heading.
    #[must_use]
    pub fn with_title(mut self, title: String) -> Self {
        self.title = title;
        self
    }
}
