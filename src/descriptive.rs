//! Descriptive statistics and box-plot geometry.
//!
//! Quartiles use a nearest-rank floor index rather than interpolation:
//!
//! - `q1 = sorted[⌊n/4⌋]`
//! - `q3 = sorted[⌊3n/4⌋]`
//! - `median` is the middle element, or the mean of the two middle elements
//!   when `n` is even.
//!
//! Two different thresholds come out of the IQR. The *fences* are clamped to
//! the observed data range and are what a box plot draws as whiskers. The
//! *outlier bounds* are the raw `q1 - 1.5·IQR` and `q3 + 1.5·IQR` values and
//! are what decides whether a point is an outlier.
//!
//! # Examples
//!
//! ```
//! use cd_spc::descriptive::quantile_stats;
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 100.0];
//! let stats = quantile_stats(&data).unwrap();
//! assert_eq!(stats.q1, 3.0);
//! assert_eq!(stats.q3, 9.0);
//! assert_eq!(stats.upper_fence, 18.0);
//! assert_eq!(stats.outliers, vec![100.0]);
//! ```

use serde::Serialize;
use tracing::debug;
use u_numflow::stats;

use crate::config::AnalysisConfig;
use crate::error::{require_finite, Result, SpcError};

/// IQR multiplier for fences and outlier bounds.
pub const FENCE_FACTOR: f64 = 1.5;

/// Five-number summary with fences and outliers.
///
/// # Invariants
///
/// - `min <= q1 <= median <= q3 <= max`
/// - `min <= lower_fence` and `upper_fence <= max`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantileStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// `max(min, q1 - 1.5·IQR)`: lower whisker end.
    pub lower_fence: f64,
    /// `min(max, q3 + 1.5·IQR)`: upper whisker end.
    pub upper_fence: f64,
    /// Values beyond the unclamped outlier bounds, ascending.
    pub outliers: Vec<f64>,
    /// IQR multiplier the bounds were computed with.
    #[serde(skip)]
    factor: f64,
}

impl QuantileStats {
    /// Interquartile range `q3 - q1`.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Unclamped outlier bounds `(q1 - k·IQR, q3 + k·IQR)`.
    pub fn outlier_bounds(&self) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - self.factor * iqr, self.q3 + self.factor * iqr)
    }

    /// Whether `value` lies outside the unclamped outlier bounds.
    pub fn is_outlier(&self, value: f64) -> bool {
        let (low, high) = self.outlier_bounds();
        value < low || value > high
    }
}

/// Computes quartiles, clamped fences, and outliers with the 1.5·IQR rule.
///
/// The caller's slice is not reordered.
///
/// # Errors
///
/// `InsufficientData` for an empty slice, `NonFinite` if any value is NaN or
/// infinite.
pub fn quantile_stats(values: &[f64]) -> Result<QuantileStats> {
    quantile_stats_with(values, FENCE_FACTOR)
}

/// [`quantile_stats`] with a custom IQR multiplier.
///
/// # Errors
///
/// As [`quantile_stats`], plus `InvalidConfig` when `factor` is negative or
/// not finite.
pub fn quantile_stats_with(values: &[f64], factor: f64) -> Result<QuantileStats> {
    if !(factor.is_finite() && factor >= 0.0) {
        return Err(SpcError::InvalidConfig(format!(
            "IQR factor {factor} must be non-negative and finite"
        )));
    }
    require_finite(values, 1).inspect_err(|e| debug!(%e, "quantile stats unavailable"))?;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let min = sorted[0];
    let max = sorted[n - 1];
    let q1 = sorted[n / 4];
    let q3 = sorted[3 * n / 4];
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let iqr = q3 - q1;
    let low_bound = q1 - factor * iqr;
    let high_bound = q3 + factor * iqr;

    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < low_bound || v > high_bound)
        .collect();

    Ok(QuantileStats {
        min,
        q1,
        median,
        q3,
        max,
        lower_fence: min.max(low_bound),
        upper_fence: max.min(high_bound),
        outliers,
        factor,
    })
}

// ---------------------------------------------------------------------------
// Basic statistics
// ---------------------------------------------------------------------------

/// Summary statistics shown next to trend charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1); `0` for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// Computes count, mean, sample standard deviation, min, max, and range.
///
/// # Examples
///
/// ```
/// use cd_spc::descriptive::basic_stats;
///
/// let s = basic_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert!((s.mean - 5.0).abs() < 1e-12);
/// assert!((s.range - 7.0).abs() < 1e-12);
/// ```
pub fn basic_stats(values: &[f64]) -> Result<BasicStats> {
    require_finite(values, 1)?;

    let mean = stats::mean(values).ok_or(SpcError::InsufficientData {
        required: 1,
        actual: values.len(),
    })?;
    let std_dev = if values.len() > 1 {
        stats::std_dev(values).unwrap_or(0.0)
    } else {
        0.0
    };
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(BasicStats {
        count: values.len(),
        mean,
        std_dev,
        min,
        max,
        range: max - min,
    })
}

// ---------------------------------------------------------------------------
// Grouped box plots
// ---------------------------------------------------------------------------

/// Box-plot summary for one named group (equipment, device, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPlotGroup {
    pub name: String,
    pub count: usize,
    pub stats: QuantileStats,
    /// Smallest value inside the outlier bounds.
    pub whisker_low: f64,
    /// Largest value inside the outlier bounds.
    pub whisker_high: f64,
}

/// Builds one box plot per group, skipping groups below
/// `config.min_group_size` values.
///
/// Plots come back sorted by group name. A group containing non-finite
/// values is skipped as well.
///
/// # Errors
///
/// `InvalidConfig` when `config` fails [`AnalysisConfig::validate`].
pub fn grouped_box_plots<S: AsRef<str>>(
    groups: &[(S, Vec<f64>)],
    config: &AnalysisConfig,
) -> Result<Vec<BoxPlotGroup>> {
    config.validate()?;

    let mut plots: Vec<BoxPlotGroup> = groups
        .iter()
        .filter_map(|(name, values)| {
            let name = name.as_ref();
            if values.len() < config.min_group_size {
                debug!(
                    group = name,
                    count = values.len(),
                    min = config.min_group_size,
                    "skipping small box-plot group"
                );
                return None;
            }
            let stats = quantile_stats_with(values, config.fence_factor).ok()?;
            let (low, high) = stats.outlier_bounds();
            // q1 and q3 always lie inside the bounds, so both folds see a value.
            let whisker_low = values
                .iter()
                .copied()
                .filter(|&v| v >= low)
                .fold(f64::INFINITY, f64::min);
            let whisker_high = values
                .iter()
                .copied()
                .filter(|&v| v <= high)
                .fold(f64::NEG_INFINITY, f64::max);
            Some(BoxPlotGroup {
                name: name.to_string(),
                count: values.len(),
                stats,
                whisker_low,
                whisker_high,
            })
        })
        .collect();
    plots.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(plots)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn quartiles_are_ordered(
            data in proptest::collection::vec(-1e6_f64..1e6, 1..=200)
        ) {
            let s = quantile_stats(&data).unwrap();
            prop_assert!(s.min <= s.q1);
            prop_assert!(s.q1 <= s.median);
            prop_assert!(s.median <= s.q3);
            prop_assert!(s.q3 <= s.max);
            prop_assert!(s.min <= s.lower_fence && s.upper_fence <= s.max);
        }

        #[test]
        fn quantile_stats_idempotent(
            data in proptest::collection::vec(-1e3_f64..1e3, 1..=50)
        ) {
            let a = quantile_stats(&data).unwrap();
            let b = quantile_stats(&data).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn outliers_lie_outside_bounds(
            data in proptest::collection::vec(-1e3_f64..1e3, 1..=80)
        ) {
            let s = quantile_stats(&data).unwrap();
            for &o in &s.outliers {
                prop_assert!(s.is_outlier(o));
            }
            let inside = data.iter().filter(|&&v| !s.is_outlier(v)).count();
            prop_assert_eq!(inside + s.outliers.len(), data.len());
        }
    }
}
