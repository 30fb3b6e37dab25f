//! Boundary-preserving left join of department metrics onto boundaries.
//!
//! Every boundary appears exactly once in the output, in boundary file
//! order. A boundary whose department has no metrics row carries `None`,
//! which downstream rendering shows as "no data" rather than zero.

use std::collections::BTreeMap;

use health_map_geography_models::{DepartmentMetrics, RegionStats};
use health_map_patient_models::Metric;
use thiserror::Error;

use crate::{Boundary, BoundarySet};

/// More than one metrics row carries the same department key.
///
/// Aggregation groups by department, so this only happens when keys were
/// normalized inconsistently. It is never resolved by picking one row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Department '{department}' matches {rows} metrics rows")]
pub struct JoinIntegrityError {
    /// The duplicated department key.
    pub department: String,
    /// How many metrics rows share the key.
    pub rows: usize,
}

/// One boundary together with its metrics, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRegion<'a> {
    /// The department outline and names.
    pub boundary: &'a Boundary,
    /// Metrics for the department, or `None` for "no data".
    pub metrics: Option<DepartmentMetrics>,
}

impl JoinedRegion<'_> {
    /// Returns the value of `metric`, or `None` if the region has no data.
    #[must_use]
    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.value(metric))
    }

    /// Detaches the statistics from the geometry.
    #[must_use]
    pub fn stats(&self) -> RegionStats {
        RegionStats {
            department: self.boundary.key.clone(),
            display_name: self.boundary.name.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

/// Keys that found no partner on the other side of the join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Departments with patients but no boundary; these patients are not
    /// shown on the map.
    pub unmatched_departments: Vec<String>,
    /// Boundaries with no patients in the current selection.
    pub boundaries_without_data: Vec<String>,
}

impl JoinReport {
    /// Logs unmatched departments at `warn` and empty boundaries at `debug`.
    pub fn log(&self) {
        if !self.unmatched_departments.is_empty() {
            log::warn!(
                "{} department(s) have patients but no boundary: {}",
                self.unmatched_departments.len(),
                self.unmatched_departments.join(", ")
            );
        }
        if !self.boundaries_without_data.is_empty() {
            log::debug!(
                "{} boundary(ies) have no data for this selection: {}",
                self.boundaries_without_data.len(),
                self.boundaries_without_data.join(", ")
            );
        }
    }
}

/// The joined spatial-metric records plus the join diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialMetrics<'a> {
    /// One entry per boundary, in boundary order.
    pub regions: Vec<JoinedRegion<'a>>,
    /// Keys left unmatched by the join.
    pub report: JoinReport,
}

impl SpatialMetrics<'_> {
    /// Returns `true` if no region carries any metrics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.iter().all(|r| r.metrics.is_none())
    }
}

/// Left-joins `metrics` onto `boundaries` by normalized department name.
///
/// # Errors
///
/// Returns [`JoinIntegrityError`] if two metrics rows share a department key.
pub fn join<'a>(
    boundaries: &'a BoundarySet,
    metrics: &[DepartmentMetrics],
) -> Result<SpatialMetrics<'a>, JoinIntegrityError> {
    let mut by_key: BTreeMap<&str, &DepartmentMetrics> = BTreeMap::new();
    for row in metrics {
        if by_key.insert(row.department.as_str(), row).is_some() {
            return Err(JoinIntegrityError {
                department: row.department.clone(),
                rows: metrics
                    .iter()
                    .filter(|m| m.department == row.department)
                    .count(),
            });
        }
    }

    let mut report = JoinReport::default();
    let regions = boundaries
        .iter()
        .map(|boundary| {
            let metrics = by_key.get(boundary.key.as_str()).map(|m| (*m).clone());
            if metrics.is_none() {
                report.boundaries_without_data.push(boundary.key.clone());
            }
            JoinedRegion { boundary, metrics }
        })
        .collect();

    report.unmatched_departments = by_key
        .keys()
        .filter(|key| !boundaries.iter().any(|b| b.key == **key))
        .map(|key| (*key).to_string())
        .collect();

    Ok(SpatialMetrics { regions, report })
}
