//! Per-department aggregation.
//!
//! Groups patients by their normalized department and computes the patient
//! count, mean age, and mean visit frequency. Departments with no patients
//! produce no row at all, so no mean is ever taken over an empty group.

use std::collections::BTreeMap;

use health_map_geography_models::DepartmentMetrics;
use health_map_patient_models::Patient;

#[derive(Default)]
struct Accumulator {
    count: u64,
    age_sum: u64,
    visits_sum: f64,
}

/// Aggregates patients into one [`DepartmentMetrics`] per department,
/// ordered by department key.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate<'a, I>(patients: I) -> Vec<DepartmentMetrics>
where
    I: IntoIterator<Item = &'a Patient>,
{
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();

    for patient in patients {
        let acc = groups.entry(patient.department.as_str()).or_default();
        acc.count += 1;
        acc.age_sum += u64::from(patient.age);
        acc.visits_sum += patient.visit_frequency;
    }

    groups
        .into_iter()
        .map(|(department, acc)| DepartmentMetrics {
            department: department.to_string(),
            patient_count: acc.count,
            mean_age: acc.age_sum as f64 / acc.count as f64,
            mean_visits: acc.visits_sum / acc.count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use crate::filter::tests::{patient, sample};
    use health_map_patient_models::Selector;

    #[test]
    fn groups_and_averages() {
        let metrics = aggregate(&sample());
        let departments: Vec<&str> = metrics.iter().map(|m| m.department.as_str()).collect();
        assert_eq!(departments, ["HUILA", "META", "TOLIMA"]);

        let huila = &metrics[0];
        assert_eq!(huila.patient_count, 2);
        assert!((huila.mean_age - 40.0).abs() < f64::EPSILON);
        assert!((huila.mean_visits - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn single_diagnosis_scenario() {
        let patients = vec![
            patient("1", "HUILA", "Femenino", "Asma", 30, 2.0),
            patient("2", "HUILA", "Femenino", "Diabetes", 50, 5.0),
        ];
        let filtered = filter(&patients, &Selector::parse("Asma"), &Selector::All);
        assert_eq!(filtered.len(), 1);

        let metrics = aggregate(filtered);
        assert_eq!(
            metrics,
            vec![DepartmentMetrics {
                department: "HUILA".to_string(),
                patient_count: 1,
                mean_age: 30.0,
                mean_visits: 2.0,
            }]
        );
    }

    #[test]
    fn counts_sum_to_filtered_len() {
        let patients = sample();
        let diagnoses = ["all", "Asma", "Diabetes", "Hipertensión", "Gripe"];
        let genders = ["all", "Femenino", "Masculino", "Otro"];
        for d in diagnoses {
            for g in genders {
                let filtered = filter(&patients, &Selector::parse(d), &Selector::parse(g));
                let expected = filtered.len() as u64;
                let total: u64 = aggregate(filtered).iter().map(|m| m.patient_count).sum();
                assert_eq!(total, expected, "diagnosis={d} gender={g}");
            }
        }
    }

    #[test]
    fn absent_departments_are_omitted() {
        let patients = sample();
        let filtered = filter(&patients, &Selector::parse("Hipertensión"), &Selector::All);
        let metrics = aggregate(filtered);
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].department, "META");
        assert!(metrics.iter().all(|m| m.mean_age.is_finite()));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let metrics = aggregate(std::iter::empty::<&Patient>());
        assert!(metrics.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let patients = sample();
        let first = aggregate(&patients);
        let second = aggregate(&patients);
        assert_eq!(first, second);
    }
}
