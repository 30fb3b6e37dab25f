#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Descriptive statistics and chart data types.
//!
//! Result types for the per-diagnosis summaries and chart series computed
//! over the full patient dataset. Drawing is left to the presentation layer;
//! these carry only the numbers.

use health_map_patient_models::Patient;
use serde::{Deserialize, Serialize};

/// Number of records in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category value (diagnosis or gender).
    pub category: String,
    /// Number of records.
    pub count: u64,
}

/// Per-diagnosis patient count and means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisSummary {
    /// Diagnosis value.
    pub diagnosis: String,
    /// Number of patients with this diagnosis.
    pub patient_count: u64,
    /// Mean patient age.
    pub mean_age: f64,
    /// Mean visit frequency.
    pub mean_visits: f64,
}

/// Overview of the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveSummary {
    /// Total number of patient records.
    pub record_count: u64,
    /// Per-diagnosis statistics, most common diagnosis first.
    pub by_diagnosis: Vec<DiagnosisSummary>,
    /// First rows of the dataset.
    pub preview: Vec<Patient>,
}

/// Five-number summary of patient age for one diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeDistribution {
    /// Diagnosis value.
    pub diagnosis: String,
    /// Youngest age.
    pub min: f64,
    /// First quartile.
    pub q1: f64,
    /// Median age.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Oldest age.
    pub max: f64,
}

/// One bar of the age histogram, split by diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub lower: f64,
    /// Upper edge (exclusive, except for the last bin).
    pub upper: f64,
    /// Total patients in the bin.
    pub total: u64,
    /// Patients in the bin per diagnosis.
    pub by_diagnosis: Vec<CategoryCount>,
}

/// A single point of the age vs visit frequency scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    /// Patient age.
    pub age: u32,
    /// Visit frequency.
    pub visits: f64,
    /// Diagnosis used for coloring.
    pub diagnosis: String,
}

/// Gender breakdown for one diagnosis (stacked bar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderBreakdown {
    /// Diagnosis value.
    pub diagnosis: String,
    /// Patient count per gender.
    pub by_gender: Vec<CategoryCount>,
}

/// All chart series for the dashboard's chart page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Patients per diagnosis (bar chart).
    pub diagnosis_counts: Vec<CategoryCount>,
    /// Age distribution per diagnosis (box plot).
    pub age_by_diagnosis: Vec<AgeDistribution>,
    /// Age histogram colored by diagnosis.
    pub age_histogram: Vec<HistogramBin>,
    /// Age vs visit frequency.
    pub age_vs_visits: Vec<ScatterPoint>,
    /// Gender vs diagnosis (stacked bars).
    pub gender_by_diagnosis: Vec<GenderBreakdown>,
}

/// Distinct values available to the diagnosis and gender selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorOptions {
    /// Sorted distinct diagnoses.
    pub diagnoses: Vec<String>,
    /// Sorted distinct genders.
    pub genders: Vec<String>,
}
