use chrono::DateTime;
use chrono::Utc;
use tracing::debug;

use crate::messages::Direction;
use crate::messages::RawMessage;
use crate::records::DowntimeInterval;

/// Computes the windows of time with zero observed messages for one
/// operator and direction between `start` and `end`.
///
/// The timestamps of the matching messages are bracketed by the two range
/// bounds before pairing, so the quiet stretches before the first and after
/// the last message are reported too. The result is ordered by interval
/// start.
pub fn windows(
    messages: &[RawMessage],
    operator: &str,
    direction: Direction,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<DowntimeInterval> {
    let mut timestamps = Vec::with_capacity(messages.len() + 2);
    timestamps.push(start);
    timestamps.extend(
        messages
            .iter()
            .filter(|message| message.matches(operator, direction))
            .map(|message| message.sent_on),
    );
    timestamps.push(end);
    timestamps.sort_unstable();

    debug!(
        matched = timestamps.len() - 2,
        operator, %direction, "computing windows of downtime"
    );

    timestamps
        .windows(2)
        .map(|pair| DowntimeInterval::between(pair[0], pair[1]))
        .collect()
}
