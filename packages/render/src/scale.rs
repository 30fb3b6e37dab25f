//! Binned color scales for the choropleth fill.
//!
//! The value domain is split into equal-width bins, one per palette stop.
//! Missing values never enter the domain and always get the neutral
//! no-data color.

use health_map_patient_models::Palette;
use serde::Serialize;

/// A palette stretched over the observed value domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScale {
    /// Palette the colors come from.
    pub palette: Palette,
    /// Smallest present value, if any region has data.
    pub min: Option<f64>,
    /// Largest present value, if any region has data.
    pub max: Option<f64>,
    /// Lower edge of each bin, one per color.
    pub thresholds: Vec<f64>,
    /// Bin colors from lightest to darkest.
    pub colors: Vec<&'static str>,
    /// Fill for regions without data.
    pub no_data_color: &'static str,
}

impl ColorScale {
    /// Builds a scale over the present values in `values`.
    ///
    /// Non-finite values are ignored along with `None`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(palette: Palette, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let (min, max) = values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold((None, None), |(min, max): (Option<f64>, Option<f64>), v| {
                (
                    Some(min.map_or(v, |m| m.min(v))),
                    Some(max.map_or(v, |m| m.max(v))),
                )
            });

        let colors = palette.colors().to_vec();
        let thresholds = match (min, max) {
            (Some(lo), Some(hi)) => {
                let width = (hi - lo) / colors.len() as f64;
                (0..colors.len())
                    .map(|i| (i as f64).mul_add(width, lo))
                    .collect()
            }
            _ => Vec::new(),
        };

        Self {
            palette,
            min,
            max,
            thresholds,
            colors,
            no_data_color: Palette::NO_DATA_COLOR,
        }
    }

    /// Returns the fill color for `value`.
    ///
    /// `None` maps to the no-data color. When every present value is equal
    /// they all map to the darkest color.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn color(&self, value: Option<f64>) -> &'static str {
        let (Some(value), Some(min), Some(max)) = (value, self.min, self.max) else {
            return self.no_data_color;
        };
        if !value.is_finite() {
            return self.no_data_color;
        }

        let last = self.colors.len() - 1;
        let span = max - min;
        if span <= 0.0 {
            return self.colors[last];
        }

        let idx = ((value - min) / span * self.colors.len() as f64).max(0.0) as usize;
        self.colors[idx.min(last)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_neutral_not_zero() {
        let scale = ColorScale::new(Palette::Reds, [Some(0.0), Some(10.0), None]);
        assert_eq!(scale.color(None), Palette::NO_DATA_COLOR);
        assert_eq!(scale.color(Some(0.0)), "#fee5d9");
        assert_ne!(scale.color(Some(0.0)), scale.color(None));
    }

    #[test]
    fn bins_span_domain() {
        let scale = ColorScale::new(Palette::Blues, [Some(0.0), Some(60.0)]);
        assert_eq!(scale.thresholds.len(), 6);
        assert!((scale.thresholds[1] - 10.0).abs() < f64::EPSILON);
        assert_eq!(scale.color(Some(0.0)), "#eff3ff");
        assert_eq!(scale.color(Some(15.0)), "#c6dbef");
        assert_eq!(scale.color(Some(60.0)), "#08519c");
    }

    #[test]
    fn missing_values_do_not_widen_domain() {
        let scale = ColorScale::new(Palette::Greens, [None, Some(3.0), None, Some(5.0)]);
        assert_eq!(scale.min, Some(3.0));
        assert_eq!(scale.max, Some(5.0));
    }

    #[test]
    fn constant_domain_uses_darkest() {
        let scale = ColorScale::new(Palette::Reds, [Some(1.0), Some(1.0)]);
        assert_eq!(scale.color(Some(1.0)), "#a50f15");
    }

    #[test]
    fn no_values_means_everything_neutral() {
        let scale = ColorScale::new(Palette::Reds, [None, None]);
        assert!(scale.thresholds.is_empty());
        assert_eq!(scale.color(Some(4.0)), Palette::NO_DATA_COLOR);
    }
}
