//! Descriptive statistics and chart series over the full dataset.
//!
//! These back the dashboard's summary and chart views. Diagnosis ordering
//! follows value-count order (most common first, ties by name).

use std::collections::BTreeMap;

use health_map_analytics_models::{
    AgeDistribution, CategoryCount, ChartData, DescriptiveSummary, DiagnosisSummary,
    GenderBreakdown, HistogramBin, ScatterPoint,
};
use health_map_patient_models::Patient;

/// Number of rows in the dataset preview.
pub const PREVIEW_ROWS: usize = 10;

/// Number of bins in the age histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Groups patients by diagnosis, preserving input order within each group.
fn by_diagnosis(patients: &[Patient]) -> BTreeMap<&str, Vec<&Patient>> {
    let mut groups: BTreeMap<&str, Vec<&Patient>> = BTreeMap::new();
    for patient in patients {
        groups
            .entry(patient.diagnosis.as_str())
            .or_default()
            .push(patient);
    }
    groups
}

/// Sorts by count descending, then by category name.
fn sort_by_count(counts: &mut [CategoryCount]) {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
}

/// Patient counts per diagnosis, most common first.
#[must_use]
pub fn diagnosis_counts(patients: &[Patient]) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = by_diagnosis(patients)
        .into_iter()
        .map(|(diagnosis, group)| CategoryCount {
            category: diagnosis.to_string(),
            count: group.len() as u64,
        })
        .collect();
    sort_by_count(&mut counts);
    counts
}

/// Per-diagnosis count, mean age, and mean visits, plus a dataset preview.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(patients: &[Patient]) -> DescriptiveSummary {
    let groups = by_diagnosis(patients);

    let by_diagnosis = diagnosis_counts(patients)
        .into_iter()
        .filter_map(|count| {
            let group = groups.get(count.category.as_str())?;
            let n = group.len() as f64;
            let age_sum: u64 = group.iter().map(|p| u64::from(p.age)).sum();
            let visits_sum: f64 = group.iter().map(|p| p.visit_frequency).sum();
            Some(DiagnosisSummary {
                diagnosis: count.category,
                patient_count: count.count,
                mean_age: age_sum as f64 / n,
                mean_visits: visits_sum / n,
            })
        })
        .collect();

    DescriptiveSummary {
        record_count: patients.len() as u64,
        by_diagnosis,
        preview: patients.iter().take(PREVIEW_ROWS).cloned().collect(),
    }
}

/// Linearly interpolated quantile of an ascending, non-empty slice.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Five-number age summary per diagnosis, sorted by diagnosis.
#[must_use]
pub fn age_distributions(patients: &[Patient]) -> Vec<AgeDistribution> {
    by_diagnosis(patients)
        .into_iter()
        .map(|(diagnosis, group)| {
            let mut ages: Vec<f64> = group.iter().map(|p| f64::from(p.age)).collect();
            ages.sort_by(f64::total_cmp);
            AgeDistribution {
                diagnosis: diagnosis.to_string(),
                min: ages[0],
                q1: quantile(&ages, 0.25),
                median: quantile(&ages, 0.5),
                q3: quantile(&ages, 0.75),
                max: ages[ages.len() - 1],
            }
        })
        .collect()
}

/// Equal-width age histogram over `[min age, max age]` split by diagnosis.
///
/// The last bin includes its upper edge. Returns no bins for an empty
/// dataset.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn age_histogram(patients: &[Patient], bins: usize) -> Vec<HistogramBin> {
    let (Some(min), Some(max)) = (
        patients.iter().map(|p| p.age).min(),
        patients.iter().map(|p| p.age).max(),
    ) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let min = f64::from(min);
    let span = f64::from(max) - min;
    let width = if span > 0.0 { span / bins as f64 } else { 1.0 };

    let mut counts: Vec<BTreeMap<&str, u64>> = vec![BTreeMap::new(); bins];
    for patient in patients {
        let idx = ((f64::from(patient.age) - min) / width) as usize;
        *counts[idx.min(bins - 1)]
            .entry(patient.diagnosis.as_str())
            .or_default() += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, by_diag)| HistogramBin {
            lower: (i as f64).mul_add(width, min),
            upper: ((i + 1) as f64).mul_add(width, min),
            total: by_diag.values().sum(),
            by_diagnosis: by_diag
                .into_iter()
                .map(|(category, count)| CategoryCount {
                    category: category.to_string(),
                    count,
                })
                .collect(),
        })
        .collect()
}

/// Gender counts per diagnosis, both sorted by name.
#[must_use]
pub fn gender_by_diagnosis(patients: &[Patient]) -> Vec<GenderBreakdown> {
    by_diagnosis(patients)
        .into_iter()
        .map(|(diagnosis, group)| {
            let mut genders: BTreeMap<&str, u64> = BTreeMap::new();
            for patient in group {
                *genders.entry(patient.gender.as_str()).or_default() += 1;
            }
            GenderBreakdown {
                diagnosis: diagnosis.to_string(),
                by_gender: genders
                    .into_iter()
                    .map(|(category, count)| CategoryCount {
                        category: category.to_string(),
                        count,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Builds every chart series.
#[must_use]
pub fn chart_data(patients: &[Patient]) -> ChartData {
    ChartData {
        diagnosis_counts: diagnosis_counts(patients),
        age_by_diagnosis: age_distributions(patients),
        age_histogram: age_histogram(patients, HISTOGRAM_BINS),
        age_vs_visits: patients
            .iter()
            .map(|p| ScatterPoint {
                age: p.age,
                visits: p.visit_frequency,
                diagnosis: p.diagnosis.clone(),
            })
            .collect(),
        gender_by_diagnosis: gender_by_diagnosis(patients),
    }
}
