use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

use crate::error::DatasetError;
use crate::records::DifferenceRecord;
use crate::records::DowntimeInterval;
use crate::records::MessageRecord;

const PREVIOUS_MESSAGE_TIMESTAMP_KEY: &str = "PreviousMessageTimestamp";
const NEXT_MESSAGE_TIMESTAMP_KEY: &str = "NextMessageTimestamp";
const DOWNTIME_DURATION_KEY: &str = "DownTimeDurationSeconds";

const PERIOD_START_KEY: &str = "PeriodStart";
const PERIOD_END_KEY: &str = "PeriodEnd";
const NUMBER_OF_MESSAGES_KEY: &str = "NumberOfMessages";
const MESSAGE_DIFFERENCE_KEY: &str = "MessageDifference";

// The exporters disagree on the shape of the same record across dataset
// variants: field names drift (`NextMessageTimestamp` vs
// `NextMessageTimeTimestamp`, `PeriodEnd` vs `periodEnd`), numbers are
// sometimes serialized as decimal strings, and timestamps come in both the
// `T`-separated and the space-separated ISO 8601 renderings. These raw
// types absorb all of that; the `TryFrom` conversions below are the only
// path into the typed records.

/// One record of a downtime dataset, as serialized by the exporters.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDowntime {
    #[serde(rename = "PreviousMessageTimestamp")]
    previous_message_timestamp: String,

    #[serde(rename = "NextMessageTimestamp", alias = "NextMessageTimeTimestamp")]
    next_message_timestamp: String,

    #[serde(rename = "DownTimeDurationSeconds")]
    duration_seconds: RawNumber,
}

impl TryFrom<RawDowntime> for DowntimeInterval {
    type Error = DatasetError;

    fn try_from(raw: RawDowntime) -> Result<DowntimeInterval, DatasetError> {
        let start = parse_instant(
            PREVIOUS_MESSAGE_TIMESTAMP_KEY,
            &raw.previous_message_timestamp,
        )?;
        let end = parse_instant(NEXT_MESSAGE_TIMESTAMP_KEY, &raw.next_message_timestamp)?;

        if start > end {
            return Err(DatasetError::UnorderedInterval { start, end });
        }

        let duration_seconds = raw.duration_seconds.whole(DOWNTIME_DURATION_KEY)?;
        if duration_seconds < 0 {
            return Err(DatasetError::Negative {
                field: DOWNTIME_DURATION_KEY,
                value: duration_seconds,
            });
        }

        Ok(DowntimeInterval {
            start,
            end,
            duration_seconds,
        })
    }
}

/// One record of a messages-per-period dataset.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPeriod {
    #[serde(rename = "PeriodStart", alias = "periodStart")]
    period_start: String,

    #[serde(rename = "PeriodEnd", alias = "periodEnd")]
    period_end: String,

    #[serde(rename = "NumberOfMessages")]
    count: RawNumber,
}

impl TryFrom<RawPeriod> for MessageRecord {
    type Error = DatasetError;

    fn try_from(raw: RawPeriod) -> Result<MessageRecord, DatasetError> {
        let period_start = parse_instant(PERIOD_START_KEY, &raw.period_start)?;
        let period_end = parse_instant(PERIOD_END_KEY, &raw.period_end)?;

        if period_start > period_end {
            return Err(DatasetError::UnorderedInterval {
                start: period_start,
                end: period_end,
            });
        }

        let count = raw.count.whole(NUMBER_OF_MESSAGES_KEY)?;
        let count = u64::try_from(count).map_err(|_| DatasetError::Negative {
            field: NUMBER_OF_MESSAGES_KEY,
            value: count,
        })?;

        Ok(MessageRecord {
            period_start,
            period_end,
            count,
        })
    }
}

/// One record of a per-period message difference dataset.
#[derive(Debug, Deserialize)]
pub(crate) struct RawDifference {
    #[serde(rename = "PeriodEnd", alias = "periodEnd")]
    period_end: String,

    #[serde(rename = "MessageDifference")]
    delta: RawNumber,
}

impl TryFrom<RawDifference> for DifferenceRecord {
    type Error = DatasetError;

    fn try_from(raw: RawDifference) -> Result<DifferenceRecord, DatasetError> {
        let period_end = parse_instant(PERIOD_END_KEY, &raw.period_end)?;
        let delta = raw.delta.value(MESSAGE_DIFFERENCE_KEY)?;

        Ok(DifferenceRecord { period_end, delta })
    }
}

/// A numeric field that the exporters serialize either as a JSON number or
/// as a decimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    fn value(&self, field: &'static str) -> Result<f64, DatasetError> {
        match self {
            RawNumber::Int(n) => Ok(*n as f64),
            RawNumber::Float(n) => Ok(*n),
            RawNumber::Text(text) => {
                text.trim().parse().map_err(|_| DatasetError::Number {
                    field,
                    value: text.clone(),
                })
            }
        }
    }

    /// The field as whole units, truncated toward zero.
    fn whole(&self, field: &'static str) -> Result<i64, DatasetError> {
        self.value(field).map(|value| value as i64)
    }
}

// The Python exporters render timestamps with `str(datetime)`, which uses a
// space separator; the JavaScript ones stick to RFC 3339.
const SPACE_SEPARATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

pub(crate) fn parse_instant(
    field: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, DatasetError> {
    let value = value.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    if let Ok(instant) = DateTime::parse_from_str(value, SPACE_SEPARATED_FORMAT) {
        return Ok(instant.with_timezone(&Utc));
    }

    Err(DatasetError::Timestamp {
        field,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_a_downtime_record() {
        let raw: RawDowntime = serde_json::from_str(
            r#"{
                "Operator": "telegram",
                "MessageDirection": "in",
                "PreviousMessageTimestamp": "2019-07-29 10:00:00+00:00",
                "NextMessageTimeTimestamp": "2019-07-29 11:30:00+00:00",
                "DownTimeDurationSeconds": "5400.0"
            }"#,
        )
        .unwrap();

        let interval = DowntimeInterval::try_from(raw).unwrap();

        assert_eq!(interval.duration_seconds, 5400);
        assert_eq!(
            interval.end.signed_duration_since(interval.start).num_seconds(),
            5400
        );
    }

    #[test]
    fn accepts_both_next_timestamp_spellings() {
        let raw: RawDowntime = serde_json::from_str(
            r#"{
                "PreviousMessageTimestamp": "2019-07-29T10:00:00+00:00",
                "NextMessageTimestamp": "2019-07-29T10:00:10+00:00",
                "DownTimeDurationSeconds": 10
            }"#,
        )
        .unwrap();

        let interval = DowntimeInterval::try_from(raw).unwrap();

        assert_eq!(interval.duration_seconds, 10);
    }

    #[test]
    fn rejects_an_unordered_interval() {
        let raw: RawDowntime = serde_json::from_str(
            r#"{
                "PreviousMessageTimestamp": "2019-07-29T12:00:00Z",
                "NextMessageTimestamp": "2019-07-29T10:00:00Z",
                "DownTimeDurationSeconds": 7200
            }"#,
        )
        .unwrap();

        let result = DowntimeInterval::try_from(raw);

        assert!(matches!(
            result,
            Err(DatasetError::UnorderedInterval { .. })
        ));
    }

    #[test]
    fn rejects_an_unparsable_duration() {
        let raw: RawDowntime = serde_json::from_str(
            r#"{
                "PreviousMessageTimestamp": "2019-07-29T10:00:00Z",
                "NextMessageTimestamp": "2019-07-29T12:00:00Z",
                "DownTimeDurationSeconds": "two hours"
            }"#,
        )
        .unwrap();

        let result = DowntimeInterval::try_from(raw);

        assert!(matches!(result, Err(DatasetError::Number { .. })));
    }

    #[test]
    fn normalizes_a_period_record_with_lowercase_keys() {
        let raw: RawPeriod = serde_json::from_str(
            r#"{
                "periodStart": "2019-07-29T10:00:00Z",
                "periodEnd": "2019-07-29T10:10:00Z",
                "NumberOfMessages": 42
            }"#,
        )
        .unwrap();

        let record = MessageRecord::try_from(raw).unwrap();

        assert_eq!(record.count, 42);
    }

    #[test]
    fn rejects_a_negative_message_count() {
        let raw: RawPeriod = serde_json::from_str(
            r#"{
                "PeriodStart": "2019-07-29T10:00:00Z",
                "PeriodEnd": "2019-07-29T10:10:00Z",
                "NumberOfMessages": -3
            }"#,
        )
        .unwrap();

        let result = MessageRecord::try_from(raw);

        assert!(matches!(result, Err(DatasetError::Negative { .. })));
    }

    #[test]
    fn normalizes_a_signed_difference_record() {
        let raw: RawDifference = serde_json::from_str(
            r#"{
                "PeriodEnd": "2019-07-29T10:20:00Z",
                "MessageDifference": -17
            }"#,
        )
        .unwrap();

        let record = DifferenceRecord::try_from(raw).unwrap();

        assert_eq!(record.delta, -17.0);
    }

    #[test]
    fn rejects_an_unrecognized_timestamp() {
        let error = parse_instant("PeriodEnd", "29/07/2019 10:00").unwrap_err();

        assert!(matches!(error, DatasetError::Timestamp { field: "PeriodEnd", .. }));
    }
}
