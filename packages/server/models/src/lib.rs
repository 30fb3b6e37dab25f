#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the health map server.
//!
//! These types are serialized to JSON for the REST API. Pipeline results
//! (`MapView`, summaries, chart series) are returned as-is; the types here
//! cover the request parameters and the API-only envelopes.

use health_map_analytics_models::SelectorOptions;
use health_map_patient_models::Metric;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the map endpoints.
///
/// Every field is optional: missing selectors mean "all" and a missing
/// metric means the patient count.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapQueryParams {
    /// Diagnosis to filter on.
    pub diagnosis: Option<String>,
    /// Gender to filter on.
    pub gender: Option<String>,
    /// Metric key (`count`, `age` or `visits`).
    pub metric: Option<String>,
}

/// A metric choice for the selector control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetricOption {
    /// Value to send back as the `metric` parameter.
    pub key: String,
    /// Display label.
    pub label: String,
}

impl From<Metric> for ApiMetricOption {
    fn from(metric: Metric) -> Self {
        Self {
            key: metric.to_string(),
            label: metric.label().to_string(),
        }
    }
}

/// Values available to each selector control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    /// Sorted distinct diagnoses.
    pub diagnoses: Vec<String>,
    /// Sorted distinct genders.
    pub genders: Vec<String>,
    /// Every metric, in display order.
    pub metrics: Vec<ApiMetricOption>,
}

impl From<&SelectorOptions> for ApiOptions {
    fn from(options: &SelectorOptions) -> Self {
        Self {
            diagnoses: options.diagnoses.clone(),
            genders: options.genders.clone(),
            metrics: Metric::all()
                .iter()
                .copied()
                .map(ApiMetricOption::from)
                .collect(),
        }
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Wraps any displayable error.
    #[must_use]
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_list_every_metric() {
        let options = ApiOptions::from(&SelectorOptions {
            diagnoses: vec!["Asma".to_string()],
            genders: vec!["Otro".to_string()],
        });
        let keys: Vec<&str> = options.metrics.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["count", "age", "visits"]);
        assert_eq!(options.metrics[1].label, "Edad promedio");
    }

    #[test]
    fn query_params_are_optional() {
        let params: MapQueryParams = serde_json::from_str(r#"{"metric":"age"}"#).unwrap();
        assert!(params.diagnosis.is_none());
        assert_eq!(params.metric.as_deref(), Some("age"));
    }

    #[test]
    fn error_body_shape() {
        let body = serde_json::to_value(ApiError::new("bad metric")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "bad metric" }));
    }
}
