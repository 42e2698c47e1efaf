//! Range (R) chart companion to the individual-value control chart.
//!
//! Each plotted point is either the spread across the measurement sites of
//! one sample (sub-group range) or, when no per-site data exists, the moving
//! range between consecutive samples.
//!
//! Limits follow the d2/d3 formulation:
//!
//! - `CL = R̄`
//! - `UCL = R̄ + 3·R̄·d3/d2`
//! - `LCL = max(0, R̄ - 3·R̄·d3/d2)`
//!
//! # Control Chart Factors
//!
//! d2 and d3 are sourced from ASTM E2587 - Standard Practice for Use of
//! Control Charts in Statistical Process Control, indexed by sub-group size
//! n = 2..=10.

use serde::Serialize;
use tracing::debug;

use super::chart::ControlLimits;
use crate::error::{require_finite, Result, SpcError};

/// d2 factors (mean of the relative range). Index 0 corresponds to n=2.
const D2: [f64; 9] = [1.128, 1.693, 2.059, 2.326, 2.534, 2.704, 2.847, 2.970, 3.078];

/// d3 factors (standard deviation of the relative range). Index 0 corresponds to n=2.
const D3: [f64; 9] = [0.853, 0.888, 0.880, 0.864, 0.848, 0.833, 0.820, 0.808, 0.797];

/// d2 for a sub-group of `n` measurements, `None` outside 2..=10.
pub fn d2(n: usize) -> Option<f64> {
    (2..=10).contains(&n).then(|| D2[n - 2])
}

/// d3 for a sub-group of `n` measurements, `None` outside 2..=10.
pub fn d3(n: usize) -> Option<f64> {
    (2..=10).contains(&n).then(|| D3[n - 2])
}

/// Range chart points and limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeChart {
    /// One range per sample.
    pub ranges: Vec<f64>,
    /// `cl` is R̄.
    pub limits: ControlLimits,
    /// Sub-group size the d2/d3 factors were taken for.
    pub subgroup_size: usize,
}

impl RangeChart {
    /// Range chart from per-sample site measurements.
    ///
    /// A sample with fewer than 2 finite site values plots a range of 0.
    ///
    /// # Errors
    ///
    /// `InsufficientData` for no samples, `InvalidConfig` when
    /// `subgroup_size` is outside 2..=10.
    ///
    /// # Examples
    ///
    /// ```
    /// use cd_spc::spc::RangeChart;
    ///
    /// let sites = vec![
    ///     vec![45.1, 45.3, 44.9, 45.0, 45.2],
    ///     vec![45.0, 45.4, 45.1, 44.8, 45.2],
    /// ];
    /// let chart = RangeChart::from_subgroups(&sites, 5).unwrap();
    /// assert_eq!(chart.ranges.len(), 2);
    /// assert!(chart.limits.ucl > chart.limits.cl);
    /// assert_eq!(chart.limits.lcl, 0.0);
    /// ```
    pub fn from_subgroups(subgroups: &[Vec<f64>], subgroup_size: usize) -> Result<Self> {
        if subgroups.is_empty() {
            return Err(SpcError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        let ranges = subgroups
            .iter()
            .map(|group| {
                let finite: Vec<f64> = group.iter().copied().filter(|v| v.is_finite()).collect();
                if finite.len() < 2 {
                    return 0.0;
                }
                let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
                max - min
            })
            .collect();
        Self::from_ranges(ranges, subgroup_size)
    }

    /// Range chart from moving ranges `|x[i] - x[i-1]|`.
    ///
    /// The first sample has no predecessor, so it repeats the first moving
    /// range and the chart keeps one point per sample.
    ///
    /// # Errors
    ///
    /// `InsufficientData` below 2 values, `NonFinite` for NaN/∞ input,
    /// `InvalidConfig` for an unsupported `subgroup_size`.
    pub fn from_moving_ranges(values: &[f64], subgroup_size: usize) -> Result<Self> {
        require_finite(values, 2)?;
        let mut ranges: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        ranges.insert(0, ranges[0]);
        Self::from_ranges(ranges, subgroup_size)
    }

    fn from_ranges(ranges: Vec<f64>, subgroup_size: usize) -> Result<Self> {
        let (Some(d2), Some(d3)) = (d2(subgroup_size), d3(subgroup_size)) else {
            return Err(SpcError::InvalidConfig(format!(
                "range chart subgroup size {subgroup_size} outside 2..=10"
            )));
        };
        let r_bar = ranges.iter().sum::<f64>() / ranges.len() as f64;
        let half_band = 3.0 * r_bar * d3 / d2;
        if r_bar == 0.0 {
            debug!("range chart has zero average range");
        }
        Ok(Self {
            ranges,
            limits: ControlLimits {
                ucl: r_bar + half_band,
                cl: r_bar,
                lcl: (r_bar - half_band).max(0.0),
            },
            subgroup_size,
        })
    }

    /// Short-term sigma estimate `R̄ / d2`.
    pub fn sigma_within(&self) -> f64 {
        d2(self.subgroup_size).map_or(0.0, |d2| self.limits.cl / d2)
    }

    /// Indices of ranges above the UCL.
    pub fn points_beyond(&self) -> Vec<usize> {
        self.ranges
            .iter()
            .enumerate()
            .filter(|(_, &r)| r > self.limits.ucl)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_lookup() {
        assert_eq!(d2(2), Some(1.128));
        assert_eq!(d2(5), Some(2.326));
        assert_eq!(d3(5), Some(0.864));
        assert_eq!(d2(1), None);
        assert_eq!(d3(11), None);
    }

    #[test]
    fn test_subgroup_ranges() {
        let groups = vec![
            vec![1.0, 3.0, 2.0, 2.5, 1.5],
            vec![2.0, 2.0, 2.0, 2.0, 4.0],
            vec![7.0],
            vec![],
        ];
        let chart = RangeChart::from_subgroups(&groups, 5).unwrap();
        assert_eq!(chart.ranges, vec![2.0, 2.0, 0.0, 0.0]);
        assert!((chart.limits.cl - 1.0).abs() < 1e-12);
        let half = 3.0 * 1.0 * 0.864 / 2.326;
        assert!((chart.limits.ucl - (1.0 + half)).abs() < 1e-12);
        assert_eq!(chart.limits.lcl, 0.0);
    }

    #[test]
    fn test_subgroup_skips_non_finite_sites() {
        let groups = vec![vec![1.0, f64::NAN, 4.0]];
        let chart = RangeChart::from_subgroups(&groups, 3).unwrap();
        assert_eq!(chart.ranges, vec![3.0]);
    }

    #[test]
    fn test_moving_ranges_duplicate_first() {
        let chart = RangeChart::from_moving_ranges(&[10.0, 12.0, 11.0, 11.5], 5).unwrap();
        assert_eq!(chart.ranges, vec![2.0, 2.0, 1.0, 0.5]);
        assert!((chart.limits.cl - 1.375).abs() < 1e-12);
    }

    #[test]
    fn test_lcl_clamps_to_zero_for_n2() {
        // n = 2: 3·d3/d2 = 2.27 > 1, so LCL clamps to zero.
        let chart = RangeChart::from_moving_ranges(&[1.0, 2.0, 1.0], 2).unwrap();
        assert_eq!(chart.limits.lcl, 0.0);
    }

    #[test]
    fn test_minimums() {
        assert!(RangeChart::from_moving_ranges(&[1.0], 5)
            .unwrap_err()
            .is_insufficient_data());
        assert!(RangeChart::from_subgroups(&[], 5)
            .unwrap_err()
            .is_insufficient_data());
        assert!(matches!(
            RangeChart::from_moving_ranges(&[1.0, 2.0], 11),
            Err(SpcError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sigma_within_and_points_beyond() {
        let mut values = vec![10.0; 20];
        values[10] = 14.0;
        let chart = RangeChart::from_moving_ranges(&values, 2).unwrap();
        assert_eq!(chart.points_beyond(), vec![10, 11]);
        assert!((chart.sigma_within() - chart.limits.cl / 1.128).abs() < 1e-12);
    }
}
