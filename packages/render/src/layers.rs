//! `GeoJSON` layers for the choropleth and its hover tooltips.
//!
//! Both layers cover the same boundaries in the same order. The choropleth
//! carries the fill style for the selected metric; the tooltip layer is
//! fully transparent and carries all three metrics regardless of which one
//! drives the fill.

use geojson::{Feature, FeatureCollection, JsonObject};
use health_map_geography::JoinedRegion;
use health_map_patient_models::Metric;

use crate::scale::ColorScale;

/// Choropleth fill opacity.
pub const FILL_OPACITY: f64 = 0.7;

/// Choropleth outline opacity.
pub const LINE_OPACITY: f64 = 0.5;

/// Tooltip placeholder for regions without data.
pub const NO_DATA_LABEL: &str = "Sin datos";

/// Tooltip field labels, in display order.
pub const TOOLTIP_ALIASES: [&str; 4] = [
    "Departamento",
    "Pacientes",
    "Edad Promedio",
    "Visitas Promedio",
];

fn object(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

fn feature(region: &JoinedRegion<'_>, properties: serde_json::Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(region.boundary.geojson_geometry()),
        id: None,
        properties: Some(object(properties)),
        foreign_members: None,
    }
}

/// Builds the filled layer colored by `metric`.
#[must_use]
pub fn choropleth(
    regions: &[JoinedRegion<'_>],
    metric: Metric,
    scale: &ColorScale,
) -> FeatureCollection {
    let features = regions
        .iter()
        .map(|region| {
            let value = region.value(metric);
            feature(
                region,
                serde_json::json!({
                    "department": region.boundary.name,
                    "key": region.boundary.key,
                    "value": value,
                    "style": {
                        "fillColor": scale.color(value),
                        "fillOpacity": FILL_OPACITY,
                        "color": "#000000",
                        "opacity": LINE_OPACITY,
                        "weight": 1,
                    },
                }),
            )
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Formats a mean for display, or the no-data label.
fn format_mean(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA_LABEL.to_string(), |v| format!("{v:.2}"))
}

/// Rows of the hover tooltip for one region: label and formatted value.
#[must_use]
pub fn tooltip_rows(region: &JoinedRegion<'_>) -> Vec<[String; 2]> {
    let metrics = region.metrics.as_ref();
    let values = [
        region.boundary.name.clone(),
        metrics.map_or_else(|| NO_DATA_LABEL.to_string(), |m| m.patient_count.to_string()),
        format_mean(metrics.map(|m| m.mean_age)),
        format_mean(metrics.map(|m| m.mean_visits)),
    ];

    TOOLTIP_ALIASES
        .iter()
        .zip(values)
        .map(|(alias, value)| [(*alias).to_string(), value])
        .collect()
}

/// Builds the transparent hover layer exposing every metric.
#[must_use]
pub fn tooltips(regions: &[JoinedRegion<'_>]) -> FeatureCollection {
    let features = regions
        .iter()
        .map(|region| {
            let metrics = region.metrics.as_ref();
            feature(
                region,
                serde_json::json!({
                    "department": region.boundary.name,
                    "patientCount": metrics.map(|m| m.patient_count),
                    "meanAge": metrics.map(|m| m.mean_age),
                    "meanVisits": metrics.map(|m| m.mean_visits),
                    "tooltip": tooltip_rows(region),
                    "style": {
                        "color": "transparent",
                        "weight": 0,
                        "fillOpacity": 0,
                    },
                }),
            )
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
