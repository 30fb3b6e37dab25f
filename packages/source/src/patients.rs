//! Patient CSV parsing.
//!
//! The CSV uses the dataset's Spanish headers. Every required
//! column must be present; the department field is normalized into the
//! join key as rows are read.

use std::io::Read;
use std::path::Path;

use health_map_geography::normalize::department_key;
use csv::StringRecord;
use health_map_patient_models::Patient;
use serde::Deserialize;

use crate::LoadError;

/// Header names that must all be present in the patient CSV.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "ID",
    "Departamento",
    "Latitud",
    "Longitud",
    "Edad",
    "Genero",
    "Diagnóstico",
    "Frecuencia_Visitas",
];

/// One CSV row as written in the file.
#[derive(Debug, Deserialize)]
struct PatientRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Departamento")]
    department: String,
    #[serde(rename = "Latitud")]
    latitude: f64,
    #[serde(rename = "Longitud")]
    longitude: f64,
    #[serde(rename = "Edad")]
    age: u32,
    #[serde(rename = "Genero")]
    gender: String,
    #[serde(rename = "Diagnóstico")]
    diagnosis: String,
    #[serde(rename = "Frecuencia_Visitas")]
    visit_frequency: f64,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            department: department_key(&row.department),
            latitude: row.latitude,
            longitude: row.longitude,
            age: row.age,
            gender: row.gender,
            diagnosis: row.diagnosis,
            visit_frequency: row.visit_frequency,
        }
    }
}

/// Loads patients from a CSV file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be opened, a required column is
/// missing, or any row fails to parse.
pub fn load(path: &Path) -> Result<Vec<Patient>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let patients = from_reader(file)?;
    log::info!("Loaded {} patients from {}", patients.len(), path.display());
    Ok(patients)
}

/// Parses patients from any CSV source.
///
/// # Errors
///
/// Returns [`LoadError::MissingColumn`] if a required header is absent,
/// [`LoadError::InvalidValue`] if a cell is blank or fails to parse (for
/// example an empty `Edad`) and [`LoadError::Csv`] for any other read
/// failure. No partial result is returned.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Patient>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(LoadError::MissingColumn { column });
    }

    let mut patients = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let row: PatientRow = record
            .deserialize(Some(&headers))
            .map_err(|e| invalid_value(&headers, &record, e))?;
        patients.push(Patient::from(row));
    }

    Ok(patients)
}

/// Pins a deserialization failure to the cell that caused it.
fn invalid_value(headers: &StringRecord, record: &StringRecord, error: csv::Error) -> LoadError {
    let field = match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.field(),
        _ => None,
    };
    let Some(field) = field.and_then(|i| usize::try_from(i).ok()) else {
        return LoadError::Csv(error);
    };

    LoadError::InvalidValue {
        line: record.position().map_or(0, csv::Position::line),
        column: headers.get(field).unwrap_or_default().to_string(),
        value: record.get(field).unwrap_or_default().to_string(),
    }
}
