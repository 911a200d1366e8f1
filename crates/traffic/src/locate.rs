use chrono::DateTime;
use chrono::Utc;

use crate::error::DatasetError;
use crate::records::Timestamped;

/// Finds the record whose timestamp lies closest to `query`.
///
/// The records must be sorted ascending by timestamp; that is the caller's
/// responsibility. The search bisects for the insertion point of `query` and
/// compares the records on either side of it, so each call is O(log n).
/// A tie on the exact midpoint resolves toward the earlier record, and
/// queries outside the covered range clamp to the first or last record.
///
/// An empty series yields [`DatasetError::EmptySeries`].
pub fn locate_nearest<T: Timestamped>(
    records: &[T],
    query: DateTime<Utc>,
) -> Result<&T, DatasetError> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(DatasetError::EmptySeries),
    };

    if query <= first.timestamp() {
        return Ok(first);
    }
    if query >= last.timestamp() {
        return Ok(last);
    }

    let index = records.partition_point(|record| record.timestamp() < query);
    let previous = &records[index - 1];
    let next = &records[index];

    let before = query.signed_duration_since(previous.timestamp());
    let after = next.timestamp().signed_duration_since(query);

    if before > after { Ok(next) } else { Ok(previous) }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Sample(DateTime<Utc>);

    impl Timestamped for Sample {
        fn timestamp(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn at(offset_seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 7, 29, 10, 0, 0).unwrap() + TimeDelta::seconds(offset_seconds)
    }

    fn series(offsets: &[i64]) -> Vec<Sample> {
        offsets.iter().map(|offset| Sample(at(*offset))).collect()
    }

    #[test]
    fn picks_the_strictly_closer_neighbour() {
        let records = series(&[0, 10, 20]);

        let nearest = locate_nearest(&records, at(6)).unwrap();

        assert_eq!(nearest, &Sample(at(10)));
    }

    #[test]
    fn a_tie_resolves_toward_the_earlier_record() {
        let records = series(&[0, 10]);

        let nearest = locate_nearest(&records, at(5)).unwrap();

        assert_eq!(nearest, &Sample(at(0)));
    }

    #[test]
    fn an_exact_match_is_returned_as_is() {
        let records = series(&[0, 10, 20]);

        let nearest = locate_nearest(&records, at(10)).unwrap();

        assert_eq!(nearest, &Sample(at(10)));
    }

    #[test]
    fn queries_before_the_range_clamp_to_the_first_record() {
        let records = series(&[0, 10, 20]);

        let nearest = locate_nearest(&records, at(-100)).unwrap();

        assert_eq!(nearest, &Sample(at(0)));
    }

    #[test]
    fn queries_after_the_range_clamp_to_the_last_record() {
        let records = series(&[0, 10, 20]);

        let nearest = locate_nearest(&records, at(100)).unwrap();

        assert_eq!(nearest, &Sample(at(20)));
    }

    #[test]
    fn repeated_queries_return_the_same_record() {
        let records = series(&[0, 7, 13, 20]);
        let query = at(9);

        let first = locate_nearest(&records, query).unwrap();
        let second = locate_nearest(&records, query).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn an_empty_series_is_an_error() {
        let records: Vec<Sample> = Vec::new();

        let result = locate_nearest(&records, at(0));

        assert!(matches!(result, Err(DatasetError::EmptySeries)));
    }
}
