//! Process capability against CD specification limits.
//!
//! Short-term indices (Cp, Cpk) use within-process sigma, estimated from the
//! average moving range as `MR̄ / d2(2)` when no sub-group estimate is
//! supplied. Long-term indices (Pp, Ppk) use the overall sample standard
//! deviation.
//!
//! | Index | Formula |
//! |-------|---------|
//! | Cp  | `(USL - LSL) / 6σ_within` |
//! | Cpk | `min(USL - x̄, x̄ - LSL) / 3σ_within` |
//! | Pp  | `(USL - LSL) / 6σ_overall` |
//! | Ppk | `min(USL - x̄, x̄ - LSL) / 3σ_overall` |
//! | Cpm | `Cp / √(1 + ((x̄ - T) / σ_within)²)` |
//!
//! # References
//!
//! - Montgomery (2019), *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 8.
//! - Chan, Cheng & Spiring (1988), "A New Measure of Process Capability: Cpm",
//!   *Journal of Quality Technology* 20(3), pp. 162--175.

use serde::{Deserialize, Serialize};
use tracing::debug;
use u_numflow::stats;

use crate::error::{require_finite, Result, SpcError};
use crate::spc::d2;

/// Specification limits for one CD target.
///
/// # Examples
///
/// ```
/// use cd_spc::capability::SpecLimits;
///
/// let spec = SpecLimits::new(Some(46.0), Some(44.0)).unwrap();
/// let data = [45.0, 45.1, 44.9, 45.2, 44.8, 45.0, 45.1, 44.9];
/// let idx = spec.compute_moving_range(&data).unwrap();
/// assert!(idx.cp.unwrap() > 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecLimits {
    pub usl: Option<f64>,
    pub lsl: Option<f64>,
    /// Target value; defaults to the midpoint of a two-sided spec.
    #[serde(default)]
    pub target: Option<f64>,
}

/// Computed capability indices.
///
/// Indices that need a limit the spec does not define are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityIndices {
    pub cp: Option<f64>,
    pub cpk: Option<f64>,
    pub cpu: Option<f64>,
    pub cpl: Option<f64>,
    pub pp: Option<f64>,
    pub ppk: Option<f64>,
    pub ppu: Option<f64>,
    pub ppl: Option<f64>,
    pub cpm: Option<f64>,
    pub mean: f64,
    pub sigma_within: f64,
    pub sigma_overall: f64,
}

impl SpecLimits {
    /// Creates a specification.
    ///
    /// # Errors
    ///
    /// `DegenerateInput` when both limits are missing, a limit is not
    /// finite, or `usl <= lsl`.
    pub fn new(usl: Option<f64>, lsl: Option<f64>) -> Result<Self> {
        let spec = Self {
            usl,
            lsl,
            target: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    /// Checks the limits, e.g. after deserializing.
    pub fn validate(&self) -> Result<()> {
        let (usl, lsl) = (self.usl, self.lsl);
        if usl.is_none() && lsl.is_none() {
            return Err(SpcError::DegenerateInput {
                reason: "at least one specification limit is required",
            });
        }
        if usl.is_some_and(|u| !u.is_finite()) || lsl.is_some_and(|l| !l.is_finite()) {
            return Err(SpcError::DegenerateInput {
                reason: "specification limits must be finite",
            });
        }
        if let (Some(u), Some(l)) = (usl, lsl) {
            if u <= l {
                return Err(SpcError::DegenerateInput {
                    reason: "USL must be greater than LSL",
                });
            }
        }
        Ok(())
    }

    /// Target used for Cpm: explicit target, else the two-sided midpoint.
    pub fn effective_target(&self) -> Option<f64> {
        self.target.or(match (self.usl, self.lsl) {
            (Some(u), Some(l)) => Some((u + l) / 2.0),
            _ => None,
        })
    }

    /// Indices with a caller-supplied within sigma (e.g. `R̄/d2` from a range
    /// chart).
    ///
    /// # Errors
    ///
    /// `InsufficientData` below 2 values, `DegenerateInput` when either sigma
    /// is zero or `sigma_within` is not positive and finite.
    pub fn compute(&self, data: &[f64], sigma_within: f64) -> Result<CapabilityIndices> {
        self.validate()?;
        require_finite(data, 2)?;
        let (mean, sigma_overall) = mean_and_sigma(data)?;
        self.indices(mean, sigma_within, sigma_overall)
    }

    /// Indices with the overall sigma used for both short and long term, so
    /// Cp == Pp and Cpk == Ppk.
    pub fn compute_overall(&self, data: &[f64]) -> Result<CapabilityIndices> {
        self.validate()?;
        require_finite(data, 2)?;
        let (mean, sigma_overall) = mean_and_sigma(data)?;
        self.indices(mean, sigma_overall, sigma_overall)
    }

    /// Indices with within sigma estimated from the average moving range.
    pub fn compute_moving_range(&self, data: &[f64]) -> Result<CapabilityIndices> {
        self.validate()?;
        require_finite(data, 2)?;
        let (mean, sigma_overall) = mean_and_sigma(data)?;
        self.indices(mean, moving_range_sigma(data)?, sigma_overall)
    }

    fn indices(&self, mean: f64, within: f64, overall: f64) -> Result<CapabilityIndices> {
        for sigma in [within, overall] {
            if !(sigma.is_finite() && sigma > 0.0) {
                debug!(within, overall, "capability undefined for zero sigma");
                return Err(SpcError::DegenerateInput {
                    reason: "capability needs a positive sigma",
                });
            }
        }

        let (cp, cpu, cpl, cpk) = self.pair(mean, within);
        let (pp, ppu, ppl, ppk) = self.pair(mean, overall);

        let cpm = match (cp, self.effective_target()) {
            (Some(cp), Some(t)) => {
                let shift = (mean - t) / within;
                Some(cp / (1.0 + shift * shift).sqrt())
            }
            _ => None,
        };

        Ok(CapabilityIndices {
            cp,
            cpk,
            cpu,
            cpl,
            pp,
            ppk,
            ppu,
            ppl,
            cpm,
            mean,
            sigma_within: within,
            sigma_overall: overall,
        })
    }

    /// `(spread, upper, lower, min)` index family for one sigma.
    #[allow(clippy::type_complexity)]
    fn pair(
        &self,
        mean: f64,
        sigma: f64,
    ) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
        let upper = self.usl.map(|u| (u - mean) / (3.0 * sigma));
        let lower = self.lsl.map(|l| (mean - l) / (3.0 * sigma));
        let spread = match (self.usl, self.lsl) {
            (Some(u), Some(l)) => Some((u - l) / (6.0 * sigma)),
            _ => None,
        };
        let worst = match (upper, lower) {
            (Some(u), Some(l)) => Some(u.min(l)),
            (one, None) | (None, one) => one,
        };
        (spread, upper, lower, worst)
    }
}

fn mean_and_sigma(data: &[f64]) -> Result<(f64, f64)> {
    let insufficient = || SpcError::InsufficientData {
        required: 2,
        actual: data.len(),
    };
    let mean = stats::mean(data).ok_or_else(insufficient)?;
    let sigma = stats::std_dev(data).ok_or_else(insufficient)?;
    Ok((mean, sigma))
}

/// Within sigma `MR̄ / d2(2)` from consecutive differences.
///
/// # Errors
///
/// `InsufficientData` below 2 values.
pub fn moving_range_sigma(data: &[f64]) -> Result<f64> {
    require_finite(data, 2)?;
    let mr_bar =
        data.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>() / (data.len() - 1) as f64;
    let d2 = d2(2).unwrap_or(1.128);
    Ok(mr_bar / d2)
}
