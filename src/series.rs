//! Measurement samples, series, and out-of-band change events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One measurement point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Measured value (typically the averaged CD of a lot).
    pub value: f64,
    /// Measurement time.
    pub timestamp: DateTime<Utc>,
    /// Display label, e.g. the lot number.
    #[serde(default)]
    pub label: String,
}

impl Sample {
    pub fn new(value: f64, timestamp: DateTime<Utc>, label: impl Into<String>) -> Self {
        Self {
            value,
            timestamp,
            label: label.into(),
        }
    }
}

/// An ordered sequence of samples.
///
/// Samples keep the order they were supplied in; time spacing may be
/// irregular and the series may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Measured values in series order.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// Timestamps in series order.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    /// Labels in series order.
    pub fn labels(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.label.as_str()).collect()
    }
}

impl From<Vec<Sample>> for Series {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// An annotation (e.g. a process change) to be placed on a series.
///
/// The payload is opaque to the analytics core; it defaults to a raw JSON
/// value as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent<P = serde_json::Value> {
    pub timestamp: DateTime<Utc>,
    pub payload: P,
}

impl<P> ChangeEvent<P> {
    pub fn new(timestamp: DateTime<Utc>, payload: P) -> Self {
        Self { timestamp, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap()
    }

    #[test]
    fn accessors_preserve_order() {
        let series: Series = vec![
            Sample::new(45.2, ts(3), "LOT-3"),
            Sample::new(44.9, ts(1), "LOT-1"),
        ]
        .into();
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(), vec![45.2, 44.9]);
        assert_eq!(series.timestamps(), vec![ts(3), ts(1)]);
        assert_eq!(series.labels(), vec!["LOT-3", "LOT-1"]);
    }

    #[test]
    fn empty_series() {
        let series = Series::default();
        assert!(series.is_empty());
        assert!(series.values().is_empty());
    }

    #[test]
    fn deserializes_backend_json() {
        let json = r#"[
            {"value": 45.1, "timestamp": "2024-03-01T08:00:00Z", "label": "LOT-1"},
            {"value": 45.3, "timestamp": "2024-03-02T08:00:00Z"}
        ]"#;
        let series: Series = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.samples()[1].label, "");
        assert_eq!(series.samples()[0].timestamp, ts(1));
    }

    #[test]
    fn change_event_with_json_payload() {
        let json = r#"{"timestamp": "2024-03-02T08:00:00Z", "payload": {"note": "PR recipe change"}}"#;
        let event: ChangeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.timestamp, ts(2));
        assert_eq!(event.payload["note"], "PR recipe change");
    }
}
