//! The immutable dataset context shared by every pipeline run.

use std::io::Read;

use health_map_geography::BoundarySet;
use health_map_patient_models::Patient;

use crate::{DatasetConfig, LoadError, patients};

/// Patients and department boundaries, loaded once and never mutated.
///
/// Department names on both sides are already normalized join keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetContext {
    patients: Vec<Patient>,
    boundaries: BoundarySet,
}

impl DatasetContext {
    /// Wraps already-loaded data.
    #[must_use]
    pub const fn new(patients: Vec<Patient>, boundaries: BoundarySet) -> Self {
        Self {
            patients,
            boundaries,
        }
    }

    /// Loads both input files named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if either file is missing, unreadable, or
    /// malformed. Nothing is returned on partial failure.
    pub fn load(config: &DatasetConfig) -> Result<Self, LoadError> {
        let patients = patients::load(&config.patients_path)?;

        let boundaries = BoundarySet::load(&config.boundaries_path, &config.name_property)
            .map_err(|source| LoadError::Boundaries {
                path: config.boundaries_path.clone(),
                source,
            })?;

        Ok(Self::new(patients, boundaries))
    }

    /// Loads both datasets from in-memory sources.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if either source is malformed.
    pub fn from_readers<P: Read, B: Read>(
        patients: P,
        boundaries: B,
        name_property: &str,
    ) -> Result<Self, LoadError> {
        let patients = patients::from_reader(patients)?;
        let boundaries = BoundarySet::from_reader(boundaries, name_property).map_err(|source| {
            LoadError::Boundaries {
                path: "<reader>".into(),
                source,
            }
        })?;
        Ok(Self::new(patients, boundaries))
    }

    /// All patient records, in file order.
    #[must_use]
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// All department boundaries, in file order.
    #[must_use]
    pub const fn boundaries(&self) -> &BoundarySet {
        &self.boundaries
    }
}
