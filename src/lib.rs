//! # cd-spc
//!
//! Statistical process control analytics for critical-dimension (CD)
//! measurement series.
//!
//! The routines turn raw measurement series into the numbers an SPC dashboard
//! draws: quantile statistics and box plots, normal-quantile approximations
//! for QQ plots and PDF overlays, control-chart zones, run-rule spans and the
//! sample index each process-change event lands on. Everything is pure and
//! synchronous; each call recomputes from its inputs.
//!
//! ## Modules
//!
//! - [`descriptive`] - Nearest-rank quartiles, IQR fences, grouped box plots
//! - [`distribution`] - Beasley-Springer-Moro quantiles, QQ plot, histogram, normality
//! - [`spc`] - Control limits, sigma zones, run rules, range chart
//! - [`capability`] - Cp, Cpk, Pp, Ppk, Cpm against spec limits
//! - [`align`] - Event-to-sample temporal alignment
//! - [`view`] - Chart state rebuilt on every input change
//! - [`series`] - Measurement samples and change events
//! - [`config`] - Analysis settings
//!
//! Malformed numeric input never panics; it surfaces as an [`SpcError`].

pub mod align;
pub mod capability;
pub mod config;
pub mod descriptive;
pub mod distribution;
pub mod error;
pub mod series;
pub mod spc;
pub mod view;

pub use error::{Result, SpcError};
