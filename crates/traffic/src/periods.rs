use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;

use crate::clock;
use crate::error::DatasetError;
use crate::messages::Direction;
use crate::messages::RawMessage;
use crate::records::DifferenceRecord;
use crate::records::MessageRecord;

/// Parses a period width from an `HH:MM:SS` clock value.
///
/// Zero-length periods are rejected; they would bucket nothing.
pub fn width_from_str(input: &str) -> Result<TimeDelta, DatasetError> {
    match clock::clock_seconds(input.trim()) {
        Some(seconds) if seconds > 0 => Ok(TimeDelta::seconds(seconds)),
        _ => Err(DatasetError::Threshold {
            value: input.to_owned(),
        }),
    }
}

/// The period bounds from `start` (inclusive) to `end` (exclusive) in steps
/// of `width`.
pub fn bounds(start: DateTime<Utc>, end: DateTime<Utc>, width: TimeDelta) -> Vec<DateTime<Utc>> {
    if width <= TimeDelta::zero() {
        return Vec::new();
    }

    let mut bounds = Vec::new();
    let mut current = start;

    while current < end {
        bounds.push(current);
        current += width;
    }

    bounds
}

/// Counts the matching messages in each half-open period `[bound, next)`.
pub fn messages_per_period(
    messages: &[RawMessage],
    operator: &str,
    direction: Direction,
    bounds: &[DateTime<Utc>],
) -> Vec<MessageRecord> {
    let mut timestamps: Vec<DateTime<Utc>> = messages
        .iter()
        .filter(|message| message.matches(operator, direction))
        .map(|message| message.sent_on)
        .collect();
    timestamps.sort_unstable();

    bounds
        .windows(2)
        .map(|pair| {
            let from = timestamps.partition_point(|ts| *ts < pair[0]);
            let to = timestamps.partition_point(|ts| *ts < pair[1]);

            MessageRecord {
                period_start: pair[0],
                period_end: pair[1],
                count: (to - from) as u64,
            }
        })
        .collect()
}

/// The signed change in message count between consecutive periods, each
/// record stamped with the end of the later period.
pub fn differences(periods: &[MessageRecord]) -> Vec<DifferenceRecord> {
    periods
        .windows(2)
        .map(|pair| DifferenceRecord {
            period_end: pair[1].period_end,
            delta: pair[1].count as f64 - pair[0].count as f64,
        })
        .collect()
}
