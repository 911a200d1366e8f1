pub(crate) mod raw;

use chrono::DateTime;
use chrono::Utc;

/// A record carrying the instant it is ordered by on the time axis.
///
/// The datasets are plotted and searched along time; this is the seam the
/// [nearest-point locator](crate::locate::locate_nearest) works through.
pub trait Timestamped {
    /// The instant this record is plotted and searched at.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// The number of messages observed in one fixed-width reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRecord {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub count: u64,
}

impl Timestamped for MessageRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.period_end
    }
}

/// A maximal span between two consecutive observed messages with no traffic.
///
/// Invariant: `start <= end` and `duration_seconds` agrees with the two
/// timestamps. The normalization boundary rejects records that break it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DowntimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: i64,
}

impl DowntimeInterval {
    /// The downtime spanning `start` to `end`, with the duration derived
    /// from the two timestamps.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> DowntimeInterval {
        let duration_seconds = end.signed_duration_since(start).num_seconds();

        Self {
            start,
            end,
            duration_seconds,
        }
    }
}

impl Timestamped for DowntimeInterval {
    fn timestamp(&self) -> DateTime<Utc> {
        self.start
    }
}

/// The change in message count between two consecutive reporting periods,
/// stamped with the end of the later period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferenceRecord {
    pub period_end: DateTime<Utc>,
    pub delta: f64,
}

impl Timestamped for DifferenceRecord {
    fn timestamp(&self) -> DateTime<Utc> {
        self.period_end
    }
}
