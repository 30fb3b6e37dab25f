//! Diagnosis and gender filtering.

use std::collections::BTreeSet;

use health_map_analytics_models::SelectorOptions;
use health_map_patient_models::{Patient, Selector};

/// Returns the patients that pass both selectors, in input order.
///
/// An empty result is a valid outcome, not an error.
#[must_use]
pub fn filter<'a>(
    patients: &'a [Patient],
    diagnosis: &Selector,
    gender: &Selector,
) -> Vec<&'a Patient> {
    let filtered: Vec<&Patient> = patients
        .iter()
        .filter(|p| diagnosis.matches(&p.diagnosis) && gender.matches(&p.gender))
        .collect();

    log::debug!(
        "Filter diagnosis={diagnosis} gender={gender}: {} of {} patients",
        filtered.len(),
        patients.len()
    );

    filtered
}

/// Collects the sorted distinct diagnosis and gender values.
#[must_use]
pub fn selector_options(patients: &[Patient]) -> SelectorOptions {
    let diagnoses: BTreeSet<&str> = patients.iter().map(|p| p.diagnosis.as_str()).collect();
    let genders: BTreeSet<&str> = patients.iter().map(|p| p.gender.as_str()).collect();

    SelectorOptions {
        diagnoses: diagnoses.into_iter().map(str::to_string).collect(),
        genders: genders.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn patient(
        id: &str,
        department: &str,
        gender: &str,
        diagnosis: &str,
        age: u32,
        visits: f64,
    ) -> Patient {
        Patient {
            id: id.to_string(),
            department: department.to_string(),
            latitude: 2.5,
            longitude: -75.5,
            age,
            gender: gender.to_string(),
            diagnosis: diagnosis.to_string(),
            visit_frequency: visits,
        }
    }

    pub(crate) fn sample() -> Vec<Patient> {
        vec![
            patient("1", "HUILA", "Femenino", "Asma", 30, 2.0),
            patient("2", "HUILA", "Masculino", "Diabetes", 50, 5.0),
            patient("3", "TOLIMA", "Femenino", "Diabetes", 61, 4.0),
            patient("4", "META", "Otro", "Hipertensión", 72, 6.0),
            patient("5", "TOLIMA", "Masculino", "Asma", 12, 1.0),
        ]
    }

    #[test]
    fn all_selectors_keep_everything() {
        let patients = sample();
        assert_eq!(filter(&patients, &Selector::All, &Selector::All).len(), 5);
    }

    #[test]
    fn filters_by_diagnosis() {
        let patients = sample();
        let out = filter(&patients, &Selector::parse("Asma"), &Selector::All);
        let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "5"]);
    }

    #[test]
    fn filters_by_both_dimensions() {
        let patients = sample();
        let out = filter(
            &patients,
            &Selector::parse("Diabetes"),
            &Selector::parse("Femenino"),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "3");
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let patients = sample();
        let out = filter(&patients, &Selector::parse("Asma"), &Selector::parse("Otro"));
        assert!(out.is_empty());
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let options = selector_options(&sample());
        assert_eq!(options.diagnoses, ["Asma", "Diabetes", "Hipertensión"]);
        assert_eq!(options.genders, ["Femenino", "Masculino", "Otro"]);
    }
}
