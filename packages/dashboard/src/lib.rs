#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The health map dashboard pipeline.
//!
//! A [`Dashboard`] owns the immutable [`DatasetContext`] and runs
//! filter → aggregate → join → render synchronously for each
//! [`Selection`]. Finished views can be memoized per selection; the cache
//! only ever skips work, it never changes a result.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use health_map_analytics::descriptive;
use health_map_analytics_models::{ChartData, DescriptiveSummary, SelectorOptions};
use health_map_geography::JoinIntegrityError;
use health_map_patient_models::{Metric, MetricParseError, Selector};
use health_map_render::MapView;
use health_map_source::DatasetContext;

/// Errors that can occur while running the pipeline for one selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The geo-join found inconsistent department keys.
    #[error(transparent)]
    Join(#[from] JoinIntegrityError),
}

/// The three user controls that determine one map.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selection {
    /// Diagnosis selector.
    pub diagnosis: Selector,
    /// Gender selector.
    pub gender: Selector,
    /// Metric driving the fill.
    pub metric: Metric,
}

impl Selection {
    /// Creates a selection from already-parsed controls.
    #[must_use]
    pub const fn new(diagnosis: Selector, gender: Selector, metric: Metric) -> Self {
        Self {
            diagnosis,
            gender,
            metric,
        }
    }

    /// Parses raw control values. Missing selectors mean "all" and a
    /// missing metric means [`Metric::Count`].
    ///
    /// # Errors
    ///
    /// Returns [`MetricParseError`] if `metric` names no known metric.
    pub fn parse(
        diagnosis: Option<&str>,
        gender: Option<&str>,
        metric: Option<&str>,
    ) -> Result<Self, MetricParseError> {
        let metric = match metric.map(str::trim) {
            None | Some("") => Metric::default(),
            Some(key) => Metric::from_key(key)?,
        };

        Ok(Self::new(
            Selector::from_option(diagnosis),
            Selector::from_option(gender),
            metric,
        ))
    }

    /// Heading for the map of this selection.
    #[must_use]
    pub fn title(&self) -> String {
        health_map_render::title(&self.diagnosis, &self.gender, self.metric)
    }
}

/// Runs the full pipeline for `selection` without caching.
///
/// # Errors
///
/// Returns [`PipelineError::Join`] if the aggregated metrics contain a
/// duplicated department key.
pub fn run(context: &DatasetContext, selection: &Selection) -> Result<MapView, PipelineError> {
    let filtered = health_map_analytics::filter(
        context.patients(),
        &selection.diagnosis,
        &selection.gender,
    );
    let metrics = health_map_analytics::aggregate(filtered);
    let spatial = health_map_geography::join(context.boundaries(), &metrics)?;
    spatial.report.log();

    if spatial.is_empty() {
        log::info!(
            "No patients match diagnosis={} gender={}",
            selection.diagnosis,
            selection.gender
        );
    }

    Ok(health_map_render::render(&spatial, selection.metric).with_title(selection.title()))
}

/// Loaded datasets plus everything derived from them that does not depend
/// on a selection.
#[derive(Debug)]
pub struct Dashboard {
    context: Arc<DatasetContext>,
    options: SelectorOptions,
    summary: DescriptiveSummary,
    charts: ChartData,
    cache: Option<Mutex<BTreeMap<Selection, Arc<MapView>>>>,
}

impl Dashboard {
    /// Builds a dashboard over `context`, with memoization when `cache` is
    /// `true`.
    #[must_use]
    pub fn new(context: Arc<DatasetContext>, cache: bool) -> Self {
        let patients = context.patients();
        let options = health_map_analytics::selector_options(patients);
        let summary = descriptive::summarize(patients);
        let charts = descriptive::chart_data(patients);

        log::info!(
            "Dashboard ready: {} patients, {} boundaries, {} diagnoses, {} genders",
            patients.len(),
            context.boundaries().len(),
            options.diagnoses.len(),
            options.genders.len()
        );

        Self {
            context,
            options,
            summary,
            charts,
            cache: cache.then(|| Mutex::new(BTreeMap::new())),
        }
    }

    /// The loaded datasets.
    #[must_use]
    pub fn context(&self) -> &DatasetContext {
        &self.context
    }

    /// Distinct diagnosis and gender values for the selector controls.
    #[must_use]
    pub const fn options(&self) -> &SelectorOptions {
        &self.options
    }

    /// Per-diagnosis statistics over the full dataset.
    #[must_use]
    pub const fn summary(&self) -> &DescriptiveSummary {
        &self.summary
    }

    /// Chart series over the full dataset.
    #[must_use]
    pub const fn charts(&self) -> &ChartData {
        &self.charts
    }

    /// Number of memoized views. Always `0` with caching disabled.
    #[must_use]
    pub fn cached_views(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| {
            cache.lock().unwrap_or_else(PoisonError::into_inner).len()
        })
    }

    /// Returns `true` if every selector is "all" or a value present in the
    /// dataset.
    fn is_known(&self, selection: &Selection) -> bool {
        let known = |selector: &Selector, values: &[String]| match selector {
            Selector::All => true,
            Selector::Only(value) => values.iter().any(|v| v == value),
        };
        known(&selection.diagnosis, &self.options.diagnoses)
            && known(&selection.gender, &self.options.genders)
    }

    /// Returns the map for `selection`, computing it on a cache miss.
    ///
    /// Only selections made of known values are memoized, which bounds the
    /// cache at `(diagnoses + 1) * (genders + 1) * metrics` entries.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the pipeline fails for this selection.
    /// Failures are not cached.
    pub fn map(&self, selection: &Selection) -> Result<Arc<MapView>, PipelineError> {
        let Some(cache) = &self.cache else {
            return run(&self.context, selection).map(Arc::new);
        };

        if !self.is_known(selection) {
            log::debug!("Not caching map for unknown selector values {selection:?}");
            return run(&self.context, selection).map(Arc::new);
        }

        if let Some(view) = cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(selection)
        {
            log::debug!("Map cache hit for {selection:?}");
            return Ok(Arc::clone(view));
        }

        let view = Arc::new(run(&self.context, selection)?);
        cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(selection.clone())
            .or_insert_with(|| Arc::clone(&view));
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use health_map_geography_models::RegionStats;
    use health_map_patient_models::Palette;

    const PATIENTS: &str = "\
ID,Departamento,Latitud,Longitud,Edad,Genero,Diagnóstico,Frecuencia_Visitas
1,Huila,2.5,-75.5,30,Femenino,Diabetes,2
2,Huila,2.5,-75.5,50,Masculino,Diabetes,4
3,Tolima,4.0,-75.2,40,Femenino,Asma,1
4,Bogota,4.7,-74.1,60,Femenino,Diabetes,6
";

    fn square(name: &str, x: f64) -> String {
        format!(
            r#"{{"type":"Feature","properties":{{"dpto_cnmbr":"{name}"}},"geometry":{{"type":"Polygon","coordinates":[[[{x},0.0],[{x1},0.0],[{x1},1.0],[{x},1.0],[{x},0.0]]]}}}}"#,
            x1 = x + 1.0
        )
    }

    fn boundaries() -> String {
        let features = [
            square("HUILA", 0.0),
            square("TOLIMA", 1.0),
            square("BOGOTÁ, D.C.", 2.0),
            square("BOGOTÁ", 3.0),
        ];
        format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        )
    }

    fn context() -> Arc<DatasetContext> {
        Arc::new(
            DatasetContext::from_readers(
                PATIENTS.as_bytes(),
                boundaries().as_bytes(),
                "dpto_cnmbr",
            )
            .unwrap(),
        )
    }

    fn region<'a>(view: &'a MapView, key: &str) -> &'a RegionStats {
        view.regions.iter().find(|r| r.department == key).unwrap()
    }

    #[test]
    fn diabetes_count_leaves_tolima_without_data() {
        let dashboard = Dashboard::new(context(), false);
        let selection = Selection::parse(Some("Diabetes"), None, Some("count")).unwrap();
        let view = dashboard.map(&selection).unwrap();

        assert_eq!(view.regions.len(), 4);
        let huila = region(&view, "HUILA").metrics.as_ref().unwrap();
        assert_eq!(huila.patient_count, 2);
        assert!((huila.mean_age - 40.0).abs() < f64::EPSILON);
        assert!((huila.mean_visits - 3.0).abs() < f64::EPSILON);
        assert!(region(&view, "TOLIMA").metrics.is_none());
        assert_eq!(view.palette, Palette::Reds);
        assert_eq!(
            view.title,
            "Distribución de pacientes (Diabetes, Todos) - Número de pacientes"
        );
    }

    #[test]
    fn accent_insensitive_join() {
        let dashboard = Dashboard::new(context(), false);
        let view = dashboard.map(&Selection::default()).unwrap();
        let bogota = region(&view, "BOGOTA").metrics.as_ref().unwrap();
        assert_eq!(bogota.patient_count, 1);
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let dashboard = Dashboard::new(context(), false);
        let selection = Selection::parse(Some("Asma"), Some("Masculino"), None).unwrap();
        let view = dashboard.map(&selection).unwrap();
        assert!(view.empty);
        assert_eq!(view.regions.len(), 4);
        assert!(view.regions.iter().all(|r| r.metrics.is_none()));
    }

    #[test]
    fn counts_sum_to_filtered_rows() {
        let dashboard = Dashboard::new(context(), false);
        let selection = Selection::parse(None, Some("Femenino"), None).unwrap();
        let view = dashboard.map(&selection).unwrap();
        let matched: u64 = view
            .regions
            .iter()
            .filter_map(|r| r.metrics.as_ref())
            .map(|m| m.patient_count)
            .sum();
        assert_eq!(matched, 3);
    }

    #[test]
    fn rejects_unknown_metric() {
        let err = Selection::parse(None, None, Some("density")).unwrap_err();
        assert_eq!(err.value, "density");
    }

    #[test]
    fn cache_returns_identical_view() {
        let dashboard = Dashboard::new(context(), true);
        let selection = Selection::parse(Some("Diabetes"), None, Some("age")).unwrap();

        let first = dashboard.map(&selection).unwrap();
        let second = dashboard.map(&selection).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(dashboard.cached_views(), 1);

        let uncached = run(dashboard.context(), &selection).unwrap();
        assert_eq!(*first, uncached);
    }

    #[test]
    fn unknown_selector_values_are_not_cached() {
        let dashboard = Dashboard::new(context(), true);
        let options = dashboard.options();
        let cap =
            (options.diagnoses.len() + 1) * (options.genders.len() + 1) * Metric::all().len();

        for i in 0..200 {
            let diagnosis = format!("unknown-{i}");
            let selection = Selection::parse(Some(&diagnosis), None, None).unwrap();
            let view = dashboard.map(&selection).unwrap();
            assert!(view.empty);
        }
        let selection = Selection::parse(None, Some("Otro"), Some("visits")).unwrap();
        assert!(dashboard.map(&selection).unwrap().empty);
        assert_eq!(dashboard.cached_views(), 0);

        for diagnosis in ["", "Asma", "Diabetes"] {
            for gender in ["", "Femenino", "Masculino"] {
                for metric in Metric::all() {
                    let selection = Selection::new(
                        Selector::parse(diagnosis),
                        Selector::parse(gender),
                        *metric,
                    );
                    dashboard.map(&selection).unwrap();
                }
            }
        }
        assert_eq!(dashboard.cached_views(), cap);
    }

    #[test]
    fn disabled_cache_stores_nothing() {
        let dashboard = Dashboard::new(context(), false);
        let selection = Selection::default();
        let first = dashboard.map(&selection).unwrap();
        let second = dashboard.map(&selection).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(dashboard.cached_views(), 0);
    }

    #[test]
    fn options_and_summary_cover_full_dataset() {
        let dashboard = Dashboard::new(context(), false);
        assert_eq!(dashboard.options().diagnoses, vec!["Asma", "Diabetes"]);
        assert_eq!(dashboard.options().genders, vec!["Femenino", "Masculino"]);
        assert_eq!(dashboard.summary().record_count, 4);
        assert_eq!(dashboard.charts().age_vs_visits.len(), 4);
    }
}
