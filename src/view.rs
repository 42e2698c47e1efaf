//! Chart state lifecycle.
//!
//! The dashboard rebuilds a chart from scratch whenever its inputs change:
//! the previous instance is destroyed, then every derived quantity is
//! recomputed from the new series. [`ChartController`] holds at most one live
//! [`ChartState`] and follows the same destroy-then-create order, so a failed
//! rebuild leaves no stale state behind.

use serde::Serialize;
use tracing::{debug, info};

use crate::align::{align_events, AlignedEvent};
use crate::config::AnalysisConfig;
use crate::error::{Result, SpcError};
use crate::series::{ChangeEvent, Series};
use crate::spc::{
    classify_value, control_limits, expand_rule_span, ControlLimits, RangeChart, RuleSet,
    RuleViolation, SigmaZones, Zone,
};

/// Everything a renderer needs to draw one control chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartState {
    pub series: Series,
    pub limits: ControlLimits,
    /// `None` when the band is degenerate; every point is then zone C.
    pub zones: Option<SigmaZones>,
    pub point_zones: Vec<Zone>,
    pub violations: Vec<RuleViolation>,
    /// Highlighted indices, one entry per violation.
    pub spans: Vec<Vec<usize>>,
    pub events: Vec<AlignedEvent<serde_json::Value>>,
    /// Companion moving-range chart; absent for a single sample.
    pub range_chart: Option<RangeChart>,
}

/// Owner of the current chart state.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use cd_spc::config::AnalysisConfig;
/// use cd_spc::series::{Sample, Series};
/// use cd_spc::view::ChartController;
///
/// let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
/// let series: Series = [45.0, 45.2, 44.9, 45.1]
///     .iter()
///     .enumerate()
///     .map(|(i, &v)| Sample::new(v, t0 + Duration::hours(i as i64), format!("W{i}")))
///     .collect();
///
/// let mut chart = ChartController::new();
/// chart.recreate(&series, None, None, &[], &AnalysisConfig::default()).unwrap();
/// assert!(chart.is_live());
/// chart.destroy();
/// assert!(!chart.is_live());
/// ```
#[derive(Debug, Default)]
pub struct ChartController {
    state: Option<ChartState>,
}

impl ChartController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a chart is currently built.
    pub fn is_live(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&ChartState> {
        self.state.as_ref()
    }

    /// Drops the current chart, if any.
    pub fn destroy(&mut self) {
        if self.state.take().is_some() {
            debug!("chart destroyed");
        }
    }

    /// Rebuilds the chart for `series`.
    ///
    /// Precomputed `limits` and `violations` are used as given; when absent
    /// they are derived with `config.sigma_level` and all eight run rules.
    ///
    /// # Errors
    ///
    /// `InsufficientData` for an empty series (or a single sample without
    /// precomputed limits), `NonFinite` for NaN/∞ values, `InvalidConfig`
    /// for a bad `config`. The controller is left destroyed on error.
    pub fn recreate(
        &mut self,
        series: &Series,
        limits: Option<ControlLimits>,
        violations: Option<&[RuleViolation]>,
        events: &[ChangeEvent],
        config: &AnalysisConfig,
    ) -> Result<&ChartState> {
        self.destroy();
        config.validate()?;

        let values = series.values();
        if values.is_empty() {
            return Err(SpcError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SpcError::NonFinite { index });
        }

        let limits = match limits {
            Some(limits) => limits,
            None => control_limits(&values, config.sigma_level)?,
        };
        let zones = SigmaZones::from_limits(&limits).ok();
        let point_zones = match &zones {
            Some(z) => z.classify_all(&values),
            None => values
                .iter()
                .map(|&v| classify_value(v, limits.cl, 0.0))
                .collect(),
        };

        let violations = match violations {
            Some(v) => v.to_vec(),
            None => RuleSet::all().detect(&values, &limits),
        };
        let spans = violations
            .iter()
            .map(|v| expand_rule_span(v, values.len()))
            .collect();

        let events = align_events(events, &series.timestamps());
        let range_chart = if values.len() >= 2 {
            RangeChart::from_moving_ranges(&values, config.range_subgroup_size).ok()
        } else {
            None
        };

        info!(
            points = values.len(),
            violations = violations.len(),
            events = events.len(),
            "chart recreated"
        );

        Ok(&*self.state.insert(ChartState {
            series: series.clone(),
            limits,
            zones,
            point_zones,
            violations,
            spans,
            events,
            range_chart,
        }))
    }

    /// Indices to highlight for the `violation`-th rule violation.
    ///
    /// Empty when no chart is live or the index is out of range.
    pub fn highlight(&self, violation: usize) -> Vec<usize> {
        self.state
            .as_ref()
            .and_then(|s| s.spans.get(violation))
            .cloned()
            .unwrap_or_default()
    }
}
