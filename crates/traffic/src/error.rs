use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io;

use chrono::DateTime;
use chrono::Utc;

/// The error type for loading and querying traffic datasets.
///
/// Errors mostly originate from I/O read operations, JSON deserialization
/// and the normalization of individual records.
#[derive(Debug)]
pub enum DatasetError {
    /// A [`std::io::Error`] encountered while reading a dataset file.
    Io(io::Error),

    /// A [`serde_json::Error`] encountered while deserializing a dataset file.
    Json(serde_json::Error),

    /// A record timestamp that none of the known exporter formats match.
    Timestamp { field: &'static str, value: String },

    /// A record number that is neither a JSON number nor a decimal string.
    Number { field: &'static str, value: String },

    /// A numeric field that must not be negative.
    Negative { field: &'static str, value: i64 },

    /// A downtime interval whose start lies after its end.
    UnorderedInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A nearest-point query over an empty series.
    EmptySeries,

    /// A threshold or period width that is neither a number of seconds
    /// nor an `HH:MM:SS` clock value.
    Threshold { value: String },
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let dataset_error = "dataset error:";

        match self {
            DatasetError::Io(error) => write!(f, "{dataset_error} I/O error: {error}"),
            DatasetError::Json(error) => {
                write!(f, "{dataset_error} JSON deserialization error: {error}")
            }
            DatasetError::Timestamp { field, value } => write!(
                f,
                "{dataset_error} the \"{field}\" field holds an unrecognized timestamp: \"{value}\""
            ),
            DatasetError::Number { field, value } => write!(
                f,
                "{dataset_error} the \"{field}\" field holds an unrecognized number: \"{value}\""
            ),
            DatasetError::Negative { field, value } => write!(
                f,
                "{dataset_error} the \"{field}\" field must not be negative, got {value}"
            ),
            DatasetError::UnorderedInterval { start, end } => write!(
                f,
                "{dataset_error} the downtime interval starts at {start}, after it ends at {end}"
            ),
            DatasetError::EmptySeries => {
                write!(f, "{dataset_error} cannot locate a record in an empty series")
            }
            DatasetError::Threshold { value } => write!(
                f,
                "{dataset_error} \"{value}\" is neither a number of seconds nor an HH:MM:SS value"
            ),
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DatasetError::Io(error) => Some(error),
            DatasetError::Json(error) => Some(error),
            DatasetError::Timestamp { .. } => None,
            DatasetError::Number { .. } => None,
            DatasetError::Negative { .. } => None,
            DatasetError::UnorderedInterval { .. } => None,
            DatasetError::EmptySeries => None,
            DatasetError::Threshold { .. } => None,
        }
    }
}

impl From<io::Error> for DatasetError {
    fn from(error: io::Error) -> Self {
        DatasetError::Io(error)
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(error: serde_json::Error) -> Self {
        DatasetError::Json(error)
    }
}
