//! Analysis configuration.
//!
//! Every field has a default matching the dashboard's conventional settings,
//! so a partial JSON document only needs to name the values it overrides.
//!
//! # Examples
//!
//! ```
//! use cd_spc::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::from_json(r#"{ "sigma_level": 2.5 }"#).unwrap();
//! assert!((config.sigma_level - 2.5).abs() < 1e-12);
//! assert_eq!(config.histogram_max_bins, 50);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpcError};

/// Tunables for the configurable analysis routines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Width of the control band in standard deviations (UCL = CL + k·s).
    pub sigma_level: f64,

    /// IQR multiplier for outlier bounds in grouped box plots.
    pub fence_factor: f64,

    /// Lower clamp for the Scott's-rule bin count.
    pub histogram_min_bins: usize,

    /// Upper clamp for the Scott's-rule bin count.
    pub histogram_max_bins: usize,

    /// Number of grid points on the normal PDF overlay.
    pub pdf_points: usize,

    /// Half-width of the PDF grid in standard deviations.
    pub pdf_sigma_span: f64,

    /// Groups with fewer values are left out of grouped box plots.
    pub min_group_size: usize,

    /// Subgroup size used to pick d2/d3 for range chart limits.
    pub range_subgroup_size: usize,

    /// Significance level for the normality decision.
    pub normality_alpha: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sigma_level: 3.0,
            fence_factor: 1.5,
            histogram_min_bins: 5,
            histogram_max_bins: 50,
            pdf_points: 200,
            pdf_sigma_span: 4.0,
            min_group_size: 5,
            range_subgroup_size: 5,
            normality_alpha: 0.05,
        }
    }
}

impl AnalysisConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every field lies in its usable range.
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma_level.is_finite() && self.sigma_level > 0.0) {
            return Err(SpcError::InvalidConfig(
                "sigma_level must be positive and finite".into(),
            ));
        }
        if !(self.fence_factor.is_finite() && self.fence_factor >= 0.0) {
            return Err(SpcError::InvalidConfig(
                "fence_factor must be non-negative and finite".into(),
            ));
        }
        if self.histogram_min_bins == 0 || self.histogram_min_bins > self.histogram_max_bins {
            return Err(SpcError::InvalidConfig(format!(
                "histogram bin bounds {}..={} are not a valid range",
                self.histogram_min_bins, self.histogram_max_bins
            )));
        }
        if self.pdf_points < 2 {
            return Err(SpcError::InvalidConfig(
                "pdf_points must be at least 2".into(),
            ));
        }
        if !(self.pdf_sigma_span.is_finite() && self.pdf_sigma_span > 0.0) {
            return Err(SpcError::InvalidConfig(
                "pdf_sigma_span must be positive and finite".into(),
            ));
        }
        if !(2..=10).contains(&self.range_subgroup_size) {
            return Err(SpcError::InvalidConfig(format!(
                "range_subgroup_size {} outside supported 2..=10",
                self.range_subgroup_size
            )));
        }
        if !(self.normality_alpha > 0.0 && self.normality_alpha < 1.0) {
            return Err(SpcError::InvalidConfig(
                "normality_alpha must lie in (0, 1)".into(),
            ));
        }
        Ok(())
    }
}
