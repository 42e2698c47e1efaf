//! Run rules and rule-violation spans.
//!
//! Violations are recorded by the index where a pattern *starts*; the rule id
//! fixes how many consecutive points the pattern covers. [`expand_rule_span`]
//! turns a record back into the highlighted indices, and [`detect_rules`]
//! produces records in the same shape the backend detector emits.
//!
//! | Rule | Pattern | Span |
//! |------|---------|------|
//! | 1 | point beyond the control limits | 1 |
//! | 2 | 9 in a row on one side of CL | 9 |
//! | 3 | 6 in a row increasing or decreasing | 6 |
//! | 4 | 14 in a row alternating up and down | 14 |
//! | 5 | 2 of 2 beyond 2σ, same side (zone A) | 2 |
//! | 6 | 4 of 4 beyond 1σ, same side (zone B) | 4 |
//! | 7 | 15 in a row within 1σ (zone C) | 15 |
//! | 8 | 8 in a row outside 1σ, either side | 8 |
//!
//! # References
//!
//! - Nelson, L.S. (1984). "The Shewhart Control Chart - Tests for Special Causes",
//!   *Journal of Quality Technology* 16(4), pp. 237-239.
//! - Western Electric (1956). *Statistical Quality Control Handbook*.

use serde::{Deserialize, Serialize};

use super::chart::ControlLimits;
use super::zones::Zone;

/// Minimum series length before rules 2-8 are evaluated.
const MIN_PATTERN_POINTS: usize = 9;

/// The eight run rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    /// Rule 1: a point beyond UCL or LCL.
    BeyondLimits,
    /// Rule 2: 9 consecutive points on the same side of the center line.
    NineOneSide,
    /// Rule 3: 6 consecutive points steadily increasing or decreasing.
    SixTrend,
    /// Rule 4: 14 consecutive points alternating up and down.
    FourteenAlternating,
    /// Rule 5: 2 consecutive points beyond 2σ on the same side.
    TwoInZoneA,
    /// Rule 6: 4 consecutive points beyond 1σ on the same side.
    FourInZoneB,
    /// Rule 7: 15 consecutive points within 1σ.
    FifteenInZoneC,
    /// Rule 8: 8 consecutive points outside 1σ on either side.
    EightOutsideZoneC,
}

impl Rule {
    pub const ALL: [Rule; 8] = [
        Rule::BeyondLimits,
        Rule::NineOneSide,
        Rule::SixTrend,
        Rule::FourteenAlternating,
        Rule::TwoInZoneA,
        Rule::FourInZoneB,
        Rule::FifteenInZoneC,
        Rule::EightOutsideZoneC,
    ];

    /// Rule for a numeric id, `None` outside 1..=8.
    pub fn from_id(id: i64) -> Option<Rule> {
        match id {
            1..=8 => usize::try_from(id - 1).ok().map(|i| Self::ALL[i]),
            _ => None,
        }
    }

    /// Numeric id (1..=8).
    pub fn id(&self) -> u8 {
        match self {
            Rule::BeyondLimits => 1,
            Rule::NineOneSide => 2,
            Rule::SixTrend => 3,
            Rule::FourteenAlternating => 4,
            Rule::TwoInZoneA => 5,
            Rule::FourInZoneB => 6,
            Rule::FifteenInZoneC => 7,
            Rule::EightOutsideZoneC => 8,
        }
    }

    /// Number of consecutive points the pattern covers.
    pub fn span_len(&self) -> usize {
        match self {
            Rule::BeyondLimits => 1,
            Rule::NineOneSide => 9,
            Rule::SixTrend => 6,
            Rule::FourteenAlternating => 14,
            Rule::TwoInZoneA => 2,
            Rule::FourInZoneB => 4,
            Rule::FifteenInZoneC => 15,
            Rule::EightOutsideZoneC => 8,
        }
    }

    /// Zone the pattern is defined on, for zone-based rules.
    pub fn zone(&self) -> Option<Zone> {
        match self {
            Rule::TwoInZoneA => Some(Zone::A),
            Rule::FourInZoneB => Some(Zone::B),
            Rule::FifteenInZoneC => Some(Zone::C),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::BeyondLimits => "one point beyond the control limits",
            Rule::NineOneSide => "9 consecutive points on the same side of the center line",
            Rule::SixTrend => "6 consecutive points increasing or decreasing",
            Rule::FourteenAlternating => "14 consecutive points alternating up and down",
            Rule::TwoInZoneA => "2 of 2 points beyond 2 sigma on the same side (zone A)",
            Rule::FourInZoneB => "4 of 4 points beyond 1 sigma on the same side (zone B)",
            Rule::FifteenInZoneC => "15 consecutive points within 1 sigma (zone C)",
            Rule::EightOutsideZoneC => "8 consecutive points outside 1 sigma",
        }
    }
}

/// A detected pattern, as delivered by the rule detector.
///
/// Accepts both `{ "ruleId", "startIndex", "length" }` and the backend's
/// `{ "rule", "position", "length" }` field names. Any integer rule id
/// deserializes; ids outside 1..=8 expand to an empty span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleViolation {
    #[serde(alias = "rule")]
    pub rule_id: i64,
    #[serde(alias = "position")]
    pub start_index: i64,
    /// Reported pattern length. Informational; the span comes from the rule id.
    #[serde(default)]
    pub length: usize,
}

impl RuleViolation {
    pub fn new(rule: Rule, start_index: usize) -> Self {
        Self {
            rule_id: i64::from(rule.id()),
            start_index: i64::try_from(start_index).unwrap_or(i64::MAX),
            length: rule.span_len(),
        }
    }

    /// Typed rule, `None` for ids outside 1..=8.
    pub fn rule(&self) -> Option<Rule> {
        Rule::from_id(self.rule_id)
    }
}

/// Indices covered by `violation`, clipped to `0..series_len`.
///
/// The span length is taken from the rule id. Unknown rule ids yield an empty
/// span.
///
/// # Examples
///
/// ```
/// use cd_spc::spc::{expand_rule_span, RuleViolation};
///
/// let v = RuleViolation { rule_id: 2, start_index: 8, length: 9 };
/// assert_eq!(expand_rule_span(&v, 10), vec![8, 9]);
/// ```
pub fn expand_rule_span(violation: &RuleViolation, series_len: usize) -> Vec<usize> {
    let Some(rule) = violation.rule() else {
        return Vec::new();
    };
    let start = violation.start_index;
    let end = start.saturating_add(rule.span_len() as i64);
    let len = i64::try_from(series_len).unwrap_or(i64::MAX);
    (start.max(0)..end.min(len))
        .filter_map(|i| usize::try_from(i).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// A selection of run rules to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::all()
    }
}

impl RuleSet {
    /// All eight rules.
    pub fn all() -> Self {
        Self {
            rules: Rule::ALL.to_vec(),
        }
    }

    /// Only the given rules (evaluated in rule-id order).
    pub fn only(rules: &[Rule]) -> Self {
        let mut rules = rules.to_vec();
        rules.sort_by_key(Rule::id);
        rules.dedup();
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Detects every enabled pattern, ordered by rule id then start index.
    ///
    /// Rule 1 runs on any length when enabled; rules 2-8 need at least 9 values.
    pub fn detect(&self, values: &[f64], limits: &ControlLimits) -> Vec<RuleViolation> {
        let bands = Bands::new(limits);
        let mut out = Vec::new();
        for &rule in &self.rules {
            if rule != Rule::BeyondLimits && values.len() < MIN_PATTERN_POINTS {
                continue;
            }
            let hits = windows_matching(values, rule, |w| bands.matches(rule, w));
            out.extend(hits);
        }
        out
    }
}

/// Detects all eight patterns in `values`.
///
/// # Examples
///
/// ```
/// use cd_spc::spc::{detect_rules, ControlLimits};
///
/// let limits = ControlLimits { ucl: 13.0, cl: 10.0, lcl: 7.0 };
/// let found = detect_rules(&[10.0, 14.0, 10.0], &limits);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].rule_id, 1);
/// assert_eq!(found[0].start_index, 1);
/// ```
pub fn detect_rules(values: &[f64], limits: &ControlLimits) -> Vec<RuleViolation> {
    RuleSet::all().detect(values, limits)
}

/// Zone boundaries used by the detector.
struct Bands {
    cl: f64,
    ucl: f64,
    lcl: f64,
    a_upper: f64,
    a_lower: f64,
    b_upper: f64,
    b_lower: f64,
}

impl Bands {
    fn new(limits: &ControlLimits) -> Self {
        let sigma = limits.sigma();
        Self {
            cl: limits.cl,
            ucl: limits.ucl,
            lcl: limits.lcl,
            a_upper: limits.cl + 2.0 * sigma,
            a_lower: limits.cl - 2.0 * sigma,
            b_upper: limits.cl + sigma,
            b_lower: limits.cl - sigma,
        }
    }

    fn matches(&self, rule: Rule, w: &[f64]) -> bool {
        match rule {
            Rule::BeyondLimits => w[0] > self.ucl || w[0] < self.lcl,
            Rule::NineOneSide => all(w, |v| v > self.cl) || all(w, |v| v < self.cl),
            Rule::SixTrend => {
                w.windows(2).all(|p| p[0] < p[1]) || w.windows(2).all(|p| p[0] > p[1])
            }
            Rule::FourteenAlternating => {
                // A step that does not go up counts as a step down.
                let steps: Vec<bool> = w.windows(2).map(|p| p[0] < p[1]).collect();
                steps.windows(2).all(|s| s[0] != s[1])
            }
            Rule::TwoInZoneA => all(w, |v| v > self.a_upper) || all(w, |v| v < self.a_lower),
            Rule::FourInZoneB => all(w, |v| v > self.b_upper) || all(w, |v| v < self.b_lower),
            Rule::FifteenInZoneC => all(w, |v| self.b_lower < v && v < self.b_upper),
            Rule::EightOutsideZoneC => all(w, |v| v < self.b_lower || v > self.b_upper),
        }
    }
}

fn all(w: &[f64], f: impl Fn(f64) -> bool) -> bool {
    w.iter().all(|&v| f(v))
}

/// Start-indexed records for every window of `rule.span_len()` values that
/// satisfies `pred`.
fn windows_matching(
    values: &[f64],
    rule: Rule,
    pred: impl Fn(&[f64]) -> bool,
) -> Vec<RuleViolation> {
    values
        .windows(rule.span_len())
        .enumerate()
        .filter(|(_, w)| pred(w))
        .map(|(i, _)| RuleViolation::new(rule, i))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn span_stays_in_bounds(
            rule_id in -3_i64..12,
            start in -40_i64..40,
            len in 0_usize..30,
        ) {
            let v = RuleViolation { rule_id, start_index: start, length: 0 };
            let span = expand_rule_span(&v, len);
            prop_assert!(span.iter().all(|&i| i < len));
            prop_assert!(span.windows(2).all(|w| w[1] == w[0] + 1));
            if let Some(rule) = Rule::from_id(rule_id) {
                prop_assert!(span.len() <= rule.span_len());
            } else {
                prop_assert!(span.is_empty());
            }
            prop_assert_eq!(span.clone(), expand_rule_span(&v, len));
        }

        #[test]
        fn detected_starts_fit_series(
            values in proptest::collection::vec(5.0_f64..15.0, 0..=40)
        ) {
            let limits = ControlLimits { ucl: 13.0, cl: 10.0, lcl: 7.0 };
            for v in detect_rules(&values, &limits) {
                let rule = v.rule().expect("detector emits known rules");
                let start = usize::try_from(v.start_index).expect("non-negative start");
                prop_assert!(start + rule.span_len() <= values.len());
            }
        }
    }
}
