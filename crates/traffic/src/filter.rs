use std::str::FromStr;

use crate::clock;
use crate::error::DatasetError;
use crate::records::DowntimeInterval;

/// A non-negative downtime duration cutoff.
///
/// Parses from a plain number of seconds (`"3600"`) or an `HH:MM:SS` clock
/// value (`"01:00:00"`), the two renderings the threshold control accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold {
    seconds: i64,
}

impl Threshold {
    pub fn from_seconds(seconds: i64) -> Threshold {
        Self { seconds }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Whether the interval lasted strictly longer than this threshold.
    pub fn exceeded_by(&self, interval: &DowntimeInterval) -> bool {
        interval.duration_seconds > self.seconds
    }
}

impl FromStr for Threshold {
    type Err = DatasetError;

    fn from_str(input: &str) -> Result<Threshold, DatasetError> {
        let input = input.trim();

        if let Ok(seconds) = input.parse::<u64>() {
            return Ok(Threshold {
                seconds: seconds as i64,
            });
        }

        match clock::clock_seconds(input) {
            Some(seconds) if seconds >= 0 => Ok(Threshold { seconds }),
            _ => Err(DatasetError::Threshold {
                value: input.to_owned(),
            }),
        }
    }
}

/// The subsequence of intervals that lasted strictly longer than the
/// threshold, in their original relative order.
pub fn exceeding(intervals: &[DowntimeInterval], threshold: Threshold) -> Vec<DowntimeInterval> {
    intervals
        .iter()
        .copied()
        .filter(|interval| threshold.exceeded_by(interval))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn interval(offset_seconds: i64, duration_seconds: i64) -> DowntimeInterval {
        let start = Utc.with_ymd_and_hms(2019, 7, 29, 10, 0, 0).unwrap()
            + TimeDelta::seconds(offset_seconds);

        DowntimeInterval::between(start, start + TimeDelta::seconds(duration_seconds))
    }

    #[test]
    fn keeps_only_intervals_longer_than_the_threshold() {
        let intervals = vec![interval(0, 10), interval(100, 9000), interval(200, 90000)];

        let kept = exceeding(&intervals, Threshold::from_seconds(3600));

        assert_eq!(kept, vec![interval(200, 90000)]);
    }

    #[test]
    fn partitions_the_input_exactly_at_the_threshold() {
        let intervals = vec![interval(0, 3600), interval(10, 3601), interval(20, 3599)];
        let threshold = Threshold::from_seconds(3600);

        let kept = exceeding(&intervals, threshold);

        assert_eq!(kept, vec![interval(10, 3601)]);
        for interval in &intervals {
            if !kept.contains(interval) {
                assert!(interval.duration_seconds <= threshold.seconds());
            }
        }
    }

    #[test]
    fn a_zero_threshold_keeps_every_nonzero_interval() {
        let intervals = vec![interval(0, 0), interval(10, 1), interval(20, 2)];

        let kept = exceeding(&intervals, Threshold::from_seconds(0));

        assert_eq!(kept, vec![interval(10, 1), interval(20, 2)]);
    }

    #[test]
    fn preserves_the_relative_order() {
        let intervals = vec![interval(0, 500), interval(10, 40), interval(20, 300)];

        let kept = exceeding(&intervals, Threshold::from_seconds(100));

        assert_eq!(kept, vec![interval(0, 500), interval(20, 300)]);
    }

    #[test]
    fn an_empty_input_yields_an_empty_output() {
        assert!(exceeding(&[], Threshold::from_seconds(0)).is_empty());
    }

    #[test]
    fn parses_seconds_and_clock_values_alike() {
        let seconds: Threshold = "3600".parse().unwrap();
        let clock: Threshold = "01:00:00".parse().unwrap();

        assert_eq!(seconds, clock);
    }

    #[test]
    fn rejects_malformed_thresholds() {
        assert!("an hour".parse::<Threshold>().is_err());
        assert!("-10".parse::<Threshold>().is_err());
        assert!("10:99:00".parse::<Threshold>().is_err());
    }
}
