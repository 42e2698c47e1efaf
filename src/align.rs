//! Event-to-sample temporal alignment.
//!
//! A change event (recipe edit, PM, chamber swap) is pinned to the first
//! sample measured at or after it. When the event is later than every
//! sample, it falls back to the sample closest in time. Control and range
//! charts over the same series call this independently and must agree, so the
//! result depends only on the inputs.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::series::ChangeEvent;

/// Index of the sample an event at `event_time` annotates.
///
/// Returns `None` only when `timestamps` is empty. Timestamps are expected in
/// series order but need not be uniformly spaced or sorted; the forward scan
/// returns the first index in iteration order whose timestamp is
/// `>= event_time`. Nearest-distance ties resolve to the earlier index.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cd_spc::align::align_event_to_index;
///
/// let ts: Vec<_> = (0..5)
///     .map(|d| Utc.with_ymd_and_hms(2024, 3, 1 + d, 8, 0, 0).unwrap())
///     .collect();
/// let event = Utc.with_ymd_and_hms(2024, 3, 2, 14, 0, 0).unwrap();
/// assert_eq!(align_event_to_index(event, &ts), Some(2));
/// assert_eq!(align_event_to_index(event, &[]), None);
/// ```
pub fn align_event_to_index(event_time: DateTime<Utc>, timestamps: &[DateTime<Utc>]) -> Option<usize> {
    if let Some(index) = timestamps.iter().position(|&t| t >= event_time) {
        return Some(index);
    }

    let distance = |t: DateTime<Utc>| -> Duration {
        if t >= event_time {
            t - event_time
        } else {
            event_time - t
        }
    };
    timestamps
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, Duration)>, (i, &t)| {
            let d = distance(t);
            match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((i, d)),
            }
        })
        .map(|(i, _)| i)
}

/// An event together with the sample index it aligns to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedEvent<P> {
    pub index: usize,
    pub event: ChangeEvent<P>,
}

/// Aligns every event onto `timestamps`, keeping input order.
///
/// Empty `timestamps` yields no aligned events.
pub fn align_events<P: Clone>(
    events: &[ChangeEvent<P>],
    timestamps: &[DateTime<Utc>],
) -> Vec<AlignedEvent<P>> {
    events
        .iter()
        .filter_map(|event| {
            align_event_to_index(event.timestamp, timestamps).map(|index| AlignedEvent {
                index,
                event: event.clone(),
            })
        })
        .collect()
}
