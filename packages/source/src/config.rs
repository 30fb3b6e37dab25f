//! Input file locations.
//!
//! Read from the environment with defaults that match the dashboard's
//! conventional data layout. Command-line flags override individual fields.

use std::path::PathBuf;

use health_map_geography::boundaries::DEFAULT_NAME_PROPERTY;

/// Default location of the patient CSV.
pub const DEFAULT_PATIENTS_PATH: &str = "salud_pacientes.csv";

/// Default location of the department boundary `GeoJSON`.
pub const DEFAULT_BOUNDARIES_PATH: &str = "data/departamentos.geojson";

/// Where to find the two input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    /// Patient CSV path.
    pub patients_path: PathBuf,
    /// Department boundary `GeoJSON` path.
    pub boundaries_path: PathBuf,
    /// Feature property holding the department name.
    pub name_property: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            patients_path: PathBuf::from(DEFAULT_PATIENTS_PATH),
            boundaries_path: PathBuf::from(DEFAULT_BOUNDARIES_PATH),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
        }
    }
}

impl DatasetConfig {
    /// Reads `PATIENTS_PATH`, `BOUNDARIES_PATH` and `BOUNDARY_NAME_PROPERTY`,
    /// falling back to the defaults for any that are unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            patients_path: lookup("PATIENTS_PATH").map_or(defaults.patients_path, PathBuf::from),
            boundaries_path: lookup("BOUNDARIES_PATH")
                .map_or(defaults.boundaries_path, PathBuf::from),
            name_property: lookup("BOUNDARY_NAME_PROPERTY").unwrap_or(defaults.name_property),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = DatasetConfig::from_lookup(|_| None);
        assert_eq!(config, DatasetConfig::default());
        assert_eq!(config.name_property, "dpto_cnmbr");
    }

    #[test]
    fn overrides_from_lookup() {
        let config = DatasetConfig::from_lookup(|key| match key {
            "PATIENTS_PATH" => Some("/data/p.csv".to_string()),
            "BOUNDARY_NAME_PROPERTY" => Some("NOMBRE".to_string()),
            _ => None,
        });
        assert_eq!(config.patients_path, PathBuf::from("/data/p.csv"));
        assert_eq!(
            config.boundaries_path,
            PathBuf::from(DEFAULT_BOUNDARIES_PATH)
        );
        assert_eq!(config.name_property, "NOMBRE");
    }
}
