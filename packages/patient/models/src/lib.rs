#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Patient record, selector, and map metric types.
//!
//! This crate defines the in-memory patient record shared by every stage of
//! the dashboard pipeline, the diagnosis/gender [`Selector`] used by the
//! filter stage, and the closed [`Metric`] and [`Palette`] enumerations that
//! drive choropleth coloring.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single patient row, loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique patient identifier.
    pub id: String,
    /// Normalized department name (the join key).
    pub department: String,
    /// Latitude of the patient's location.
    pub latitude: f64,
    /// Longitude of the patient's location.
    pub longitude: f64,
    /// Age in years.
    pub age: u32,
    /// Gender category (e.g. "Masculino", "Femenino", "Otro").
    pub gender: String,
    /// Diagnosis category (e.g. "Diabetes", "Asma").
    pub diagnosis: String,
    /// Number of medical visits.
    pub visit_frequency: f64,
}

/// Selects either every value of a categorical column or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Selector {
    /// No filtering on this dimension.
    #[default]
    All,
    /// Only rows whose value equals this one exactly.
    Only(String),
}

impl Selector {
    /// Display label used for the "all" option.
    pub const ALL_LABEL: &str = "Todos";

    /// Parses a selector from user input.
    ///
    /// Empty input, `"all"` and `"todos"` (any case) select everything;
    /// anything else is an exact value.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case(Self::ALL_LABEL)
        {
            Self::All
        } else {
            Self::Only(trimmed.to_string())
        }
    }

    /// Parses an optional query value, treating `None` as [`Selector::All`].
    #[must_use]
    pub fn from_option(input: Option<&str>) -> Self {
        input.map_or(Self::All, Self::parse)
    }

    /// Returns `true` if `value` passes this selector.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }

    /// Human-readable label for headings.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => Self::ALL_LABEL,
            Self::Only(value) => value,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The per-department value that drives the choropleth fill.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Metric {
    /// Number of patients in the department.
    #[default]
    #[strum(to_string = "count", serialize = "num_pacientes")]
    Count,
    /// Mean patient age.
    #[strum(to_string = "age", serialize = "edad")]
    Age,
    /// Mean visit frequency.
    #[strum(to_string = "visits", serialize = "frecuencia_visitas")]
    Visits,
}

impl Metric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Count, Self::Age, Self::Visits]
    }

    /// Display label shown in selectors, legends, and headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Count => "Número de pacientes",
            Self::Age => "Edad promedio",
            Self::Visits => "Visitas promedio",
        }
    }

    /// The color scale used when this metric drives the fill.
    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::Count => Palette::Reds,
            Self::Age => Palette::Blues,
            Self::Visits => Palette::Greens,
        }
    }

    /// Parses a metric selector key.
    ///
    /// # Errors
    ///
    /// Returns [`MetricParseError`] if `key` names no known metric.
    pub fn from_key(key: &str) -> Result<Self, MetricParseError> {
        key.trim().parse().map_err(|_| MetricParseError {
            value: key.to_string(),
        })
    }
}

/// Error returned when a metric selector names no known [`Metric`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricParseError {
    /// The unrecognized selector value.
    pub value: String,
}

impl std::fmt::Display for MetricParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown metric '{}': expected one of count, age, visits",
            self.value
        )
    }
}

impl std::error::Error for MetricParseError {}

/// Sequential color scales (`ColorBrewer`, six classes).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Palette {
    /// Warm scale, light to dark red.
    Reds,
    /// Cool scale, light to dark blue.
    Blues,
    /// Green scale, light to dark green.
    Greens,
}

impl Palette {
    /// Fill color for regions without data.
    pub const NO_DATA_COLOR: &str = "#d3d3d3";

    /// Color stops from lightest to darkest.
    #[must_use]
    pub const fn colors(self) -> &'static [&'static str] {
        match self {
            Self::Reds => &[
                "#fee5d9", "#fcbba1", "#fc9272", "#fb6a4a", "#de2d26", "#a50f15",
            ],
            Self::Blues => &[
                "#eff3ff", "#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c",
            ],
            Self::Greens => &[
                "#edf8e9", "#c7e9c0", "#a1d99b", "#74c476", "#31a354", "#006d2c",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_all_aliases() {
        assert_eq!(Selector::parse("all"), Selector::All);
        assert_eq!(Selector::parse("Todos"), Selector::All);
        assert_eq!(Selector::parse("  "), Selector::All);
        assert_eq!(Selector::from_option(None), Selector::All);
    }

    #[test]
    fn selector_exact_match() {
        let sel = Selector::parse("Asma");
        assert_eq!(sel, Selector::Only("Asma".to_string()));
        assert!(sel.matches("Asma"));
        assert!(!sel.matches("asma"));
        assert!(!sel.matches("Diabetes"));
        assert!(Selector::All.matches("anything"));
    }

    #[test]
    fn metric_parses_keys_and_aliases() {
        assert_eq!(Metric::from_key("count"), Ok(Metric::Count));
        assert_eq!(Metric::from_key("AGE"), Ok(Metric::Age));
        assert_eq!(Metric::from_key("Frecuencia_Visitas"), Ok(Metric::Visits));
        assert_eq!(Metric::from_key("Num_Pacientes"), Ok(Metric::Count));
    }

    #[test]
    fn metric_rejects_unknown() {
        let err = Metric::from_key("weight").unwrap_err();
        assert_eq!(err.value, "weight");
    }

    #[test]
    fn metric_display_roundtrip() {
        for metric in Metric::all() {
            assert_eq!(Metric::from_key(&metric.to_string()), Ok(*metric));
        }
    }

    #[test]
    fn palette_is_metric_specific_and_deterministic() {
        assert_eq!(Metric::Age.palette(), Metric::Age.palette());
        assert_eq!(Metric::Count.palette(), Palette::Reds);
        assert_eq!(Metric::Age.palette(), Palette::Blues);
        assert_eq!(Metric::Visits.palette(), Palette::Greens);
    }

    #[test]
    fn palettes_have_six_stops() {
        for palette in [Palette::Reds, Palette::Blues, Palette::Greens] {
            assert_eq!(palette.colors().len(), 6);
        }
    }
}
