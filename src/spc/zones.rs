//! Sigma zones of a control band.
//!
//! With `σ = (UCL - CL) / 3` the band splits into three zones on each side of
//! the center line:
//!
//! | Zone | Distance from CL |
//! |------|------------------|
//! | C | `<= 1σ` |
//! | B | `> 1σ` and `<= 2σ` |
//! | A | `> 2σ` (including points beyond the limits) |
//!
//! # References
//!
//! - Western Electric (1956). *Statistical Quality Control Handbook*.

use serde::Serialize;
use tracing::debug;

use super::chart::ControlLimits;
use crate::error::{Result, SpcError};

/// Sigma zone of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Zone {
    /// Between 2σ and the control limit (or beyond it).
    A,
    /// Between 1σ and 2σ.
    B,
    /// Within 1σ of the center line.
    C,
}

impl Zone {
    /// Human-readable band description.
    pub fn band(&self) -> &'static str {
        match self {
            Zone::A => "2σ-3σ",
            Zone::B => "1σ-2σ",
            Zone::C => "0-1σ",
        }
    }
}

/// Zone boundaries derived from a center line and control limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigmaZones {
    pub center: f64,
    pub ucl: f64,
    pub lcl: f64,
    pub sigma: f64,
    pub zone_a_upper: f64,
    pub zone_a_lower: f64,
    pub zone_b_upper: f64,
    pub zone_b_lower: f64,
}

/// Computes zone boundaries from `center`, `ucl` and `lcl`.
///
/// # Errors
///
/// `DegenerateInput` when `ucl <= center`, `NonFinite` when any input is NaN
/// or infinite (index 0 = center, 1 = ucl, 2 = lcl).
///
/// # Examples
///
/// ```
/// use cd_spc::spc::{sigma_zones, Zone};
///
/// let zones = sigma_zones(100.0, 130.0, 70.0).unwrap();
/// assert_eq!(zones.sigma, 10.0);
/// assert_eq!(zones.zone_a_upper, 120.0);
/// assert_eq!(zones.zone_b_upper, 110.0);
/// assert_eq!(zones.classify(125.0), Zone::A);
/// ```
pub fn sigma_zones(center: f64, ucl: f64, lcl: f64) -> Result<SigmaZones> {
    if let Some(index) = [center, ucl, lcl].iter().position(|v| !v.is_finite()) {
        return Err(SpcError::NonFinite { index });
    }
    if ucl <= center {
        debug!(center, ucl, "degenerate control band");
        return Err(SpcError::DegenerateInput {
            reason: "upper control limit must lie above the center line",
        });
    }

    let sigma = (ucl - center) / 3.0;
    Ok(SigmaZones {
        center,
        ucl,
        lcl,
        sigma,
        zone_a_upper: center + 2.0 * sigma,
        zone_a_lower: center - 2.0 * sigma,
        zone_b_upper: center + sigma,
        zone_b_lower: center - sigma,
    })
}

impl SigmaZones {
    /// Zones for a set of control limits.
    pub fn from_limits(limits: &ControlLimits) -> Result<Self> {
        sigma_zones(limits.cl, limits.ucl, limits.lcl)
    }

    /// Zone of `value`.
    pub fn classify(&self, value: f64) -> Zone {
        classify_value(value, self.center, self.sigma)
    }

    /// Zone of every value, in order.
    pub fn classify_all(&self, values: &[f64]) -> Vec<Zone> {
        values.iter().map(|&v| self.classify(v)).collect()
    }
}

/// Zone of `value` for a band of width `sigma` around `center`.
///
/// A non-positive or non-finite `sigma` is a zero-variance band and puts every
/// value in zone C.
pub fn classify_value(value: f64, center: f64, sigma: f64) -> Zone {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Zone::C;
    }
    let distance = (value - center).abs();
    if distance > 2.0 * sigma {
        Zone::A
    } else if distance > sigma {
        Zone::B
    } else {
        Zone::C
    }
}
