//! Control limits.
//!
//! Limits either arrive precomputed from the backend or are derived here from
//! the plotted values as `mean ± k·s`.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.

use serde::{Deserialize, Serialize};
use tracing::debug;
use u_numflow::stats;

use crate::error::{require_finite, Result, SpcError};

/// Control limits for a chart.
///
/// Represents the upper control limit (UCL), center line (CL), and lower
/// control limit (LCL).
///
/// # Invariants
///
/// - `lcl <= cl <= ucl` for limits computed by [`control_limits`]
/// - Precomputed limits are taken as-is; [`super::sigma_zones`] reports a
///   band with `ucl <= cl` as degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Upper control limit.
    pub ucl: f64,
    /// Center line (process mean).
    pub cl: f64,
    /// Lower control limit.
    pub lcl: f64,
}

impl ControlLimits {
    /// One standard deviation implied by the upper half-band, `(UCL - CL) / 3`.
    pub fn sigma(&self) -> f64 {
        (self.ucl - self.cl) / 3.0
    }

    /// Whether `value` lies strictly outside the limits.
    pub fn is_beyond(&self, value: f64) -> bool {
        value > self.ucl || value < self.lcl
    }
}

/// Computes `CL = mean`, `UCL/LCL = CL ± sigma_level·s` with `s` the sample
/// standard deviation.
///
/// # Errors
///
/// `InsufficientData` below 2 values, `NonFinite` for NaN/∞ input,
/// `DegenerateInput` for a non-positive `sigma_level`.
///
/// # Examples
///
/// ```
/// use cd_spc::spc::control_limits;
///
/// let limits = control_limits(&[9.0, 10.0, 11.0], 3.0).unwrap();
/// assert!((limits.cl - 10.0).abs() < 1e-12);
/// assert!((limits.ucl - 13.0).abs() < 1e-12);
/// assert!((limits.lcl - 7.0).abs() < 1e-12);
/// ```
pub fn control_limits(values: &[f64], sigma_level: f64) -> Result<ControlLimits> {
    if !(sigma_level.is_finite() && sigma_level > 0.0) {
        return Err(SpcError::DegenerateInput {
            reason: "sigma_level must be positive",
        });
    }
    require_finite(values, 2)?;

    let insufficient = || SpcError::InsufficientData {
        required: 2,
        actual: values.len(),
    };
    let cl = stats::mean(values).ok_or_else(insufficient)?;
    let s = stats::std_dev(values).ok_or_else(insufficient)?;
    if s == 0.0 {
        debug!(cl, "control limits collapse onto the center line");
    }

    Ok(ControlLimits {
        ucl: cl + sigma_level * s,
        cl,
        lcl: cl - sigma_level * s,
    })
}
