//! Statistical Process Control (SPC) chart geometry.
//!
//! # Control Limits
//!
//! - [`ControlLimits`] - UCL / CL / LCL, precomputed or from [`control_limits`]
//! - [`RangeChart`] - sub-group or moving-range companion chart
//!
//! # Zones
//!
//! - [`sigma_zones`] - zone A/B/C boundaries from a control band
//! - [`Zone`] - classification of a single value
//!
//! # Run Rules
//!
//! - [`Rule`] - the eight run rules and the span each one covers
//! - [`expand_rule_span`] - indices highlighted by a [`RuleViolation`]
//! - [`detect_rules`] - start-indexed violations for a series
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.
//! - Nelson, L.S. (1984). "The Shewhart Control Chart - Tests for Special Causes",
//!   *Journal of Quality Technology* 16(4), pp. 237-239.

mod chart;
mod range;
mod rules;
mod zones;

pub use chart::{control_limits, ControlLimits};
pub use range::{d2, d3, RangeChart};
pub use rules::{detect_rules, expand_rule_span, Rule, RuleSet, RuleViolation};
pub use zones::{classify_value, sigma_zones, SigmaZones, Zone};
