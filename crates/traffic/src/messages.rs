use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

/// The direction a message travelled relative to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// One message from the platform export.
///
/// Only the fields the analysis reads are kept; the export attaches many
/// more, which the deserializer ignores.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub urn: String,
    pub direction: Direction,
    pub sent_on: DateTime<Utc>,
}

impl RawMessage {
    const TEL_SCHEME: &str = "tel";

    /// Whether the message belongs to `operator` and travelled in
    /// `direction`.
    ///
    /// For `tel:` URNs the operator is matched as a dialing-code prefix of
    /// the phone number; for every other scheme the scheme itself must
    /// equal the operator name (e.g. `telegram`).
    pub fn matches(&self, operator: &str, direction: Direction) -> bool {
        if self.direction != direction {
            return false;
        }

        match self.urn.split_once(':') {
            Some((scheme, number)) if scheme == Self::TEL_SCHEME => number
                .trim_start_matches('+')
                .starts_with(operator.trim_start_matches('+')),
            Some((scheme, _)) => scheme == operator,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn message(urn: &str, direction: Direction) -> RawMessage {
        RawMessage {
            urn: urn.to_owned(),
            direction,
            sent_on: Utc.with_ymd_and_hms(2019, 7, 29, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn matches_by_scheme_and_direction() {
        let message = message("telegram:123456", Direction::In);

        assert!(message.matches("telegram", Direction::In));
        assert!(!message.matches("telegram", Direction::Out));
        assert!(!message.matches("whatsapp", Direction::In));
    }

    #[test]
    fn matches_tel_urns_by_dialing_prefix() {
        let message = message("tel:+252612345678", Direction::Out);

        assert!(message.matches("+25261", Direction::Out));
        assert!(message.matches("25261", Direction::Out));
        assert!(!message.matches("+25290", Direction::Out));
    }

    #[test]
    fn a_schemeless_urn_matches_nothing() {
        let message = message("612345678", Direction::In);

        assert!(!message.matches("612345678", Direction::In));
    }

    #[test]
    fn deserializes_an_export_record() {
        let message: RawMessage = serde_json::from_str(
            r#"{
                "id": 4105423,
                "urn": "tel:+252612345678",
                "direction": "in",
                "type": "inbox",
                "sent_on": "2019-07-29T10:04:33.123456Z"
            }"#,
        )
        .unwrap();

        assert_eq!(message.direction, Direction::In);
    }
}
