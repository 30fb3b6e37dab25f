#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-department metric types.
//!
//! These types carry the aggregated statistics for one department. A
//! department that has no patients after filtering is represented by the
//! absence of a [`DepartmentMetrics`] value, never by a zeroed one.

use health_map_patient_models::Metric;
use serde::{Deserialize, Serialize};

/// Aggregated statistics for one department over a filtered patient set.
///
/// Only ever built from a non-empty group, so both means are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentMetrics {
    /// Normalized department name (the join key).
    pub department: String,
    /// Number of patients in the group.
    pub patient_count: u64,
    /// Arithmetic mean of patient age.
    pub mean_age: f64,
    /// Arithmetic mean of visit frequency.
    pub mean_visits: f64,
}

impl DepartmentMetrics {
    /// Returns the value of `metric` for this department.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Count => self.patient_count as f64,
            Metric::Age => self.mean_age,
            Metric::Visits => self.mean_visits,
        }
    }
}

/// Statistics for a map region, where `None` means "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStats {
    /// Normalized department name.
    pub department: String,
    /// Department name as it appears in the boundary file.
    pub display_name: String,
    /// Metrics for the region, if any filtered patient falls in it.
    pub metrics: Option<DepartmentMetrics>,
}

impl RegionStats {
    /// Returns the value of `metric`, or `None` if the region has no data.
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.value(metric))
    }

    /// Returns `true` if no filtered patient falls in this region.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.metrics.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn huila() -> DepartmentMetrics {
        DepartmentMetrics {
            department: "HUILA".to_string(),
            patient_count: 3,
            mean_age: 41.5,
            mean_visits: 2.25,
        }
    }

    #[test]
    fn metric_value_lookup() {
        let m = huila();
        assert!((m.value(Metric::Count) - 3.0).abs() < f64::EPSILON);
        assert!((m.value(Metric::Age) - 41.5).abs() < f64::EPSILON);
        assert!((m.value(Metric::Visits) - 2.25).abs() < f64::EPSILON);
    }

    #[test]
    fn region_without_metrics_has_no_value() {
        let region = RegionStats {
            department: "TOLIMA".to_string(),
            display_name: "Tolima".to_string(),
            metrics: None,
        };
        assert!(region.is_empty());
        for metric in Metric::all() {
            assert_eq!(region.value(*metric), None);
        }
    }
}
