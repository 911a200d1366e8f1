use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::DatasetError;
use crate::messages::RawMessage;
use crate::records::DifferenceRecord;
use crate::records::DowntimeInterval;
use crate::records::MessageRecord;
use crate::records::raw::RawDifference;
use crate::records::raw::RawDowntime;
use crate::records::raw::RawPeriod;

/// Reads a downtime dataset, skipping the records that fail normalization.
pub fn downtime(path: &Path) -> Result<Vec<DowntimeInterval>, DatasetError> {
    normalize::<RawDowntime, DowntimeInterval>(path)
}

/// Reads a per-period message difference dataset, skipping the records that
/// fail normalization.
pub fn differences(path: &Path) -> Result<Vec<DifferenceRecord>, DatasetError> {
    normalize::<RawDifference, DifferenceRecord>(path)
}

/// Reads a messages-per-period dataset, skipping the records that fail
/// normalization.
pub fn periods(path: &Path) -> Result<Vec<MessageRecord>, DatasetError> {
    normalize::<RawPeriod, MessageRecord>(path)
}

/// Reads a raw platform message export.
pub fn raw_messages(path: &Path) -> Result<Vec<RawMessage>, DatasetError> {
    let file = File::open(path)?;
    let messages = serde_json::from_reader(BufReader::new(file))?;

    Ok(messages)
}

// A file that cannot be read or is not a JSON array at all is an error; a
// record inside it that fails normalization only costs that record.
fn normalize<R, T>(path: &Path) -> Result<Vec<T>, DatasetError>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = DatasetError>,
{
    let file = File::open(path)?;
    let raw: Vec<R> = serde_json::from_reader(BufReader::new(file))?;

    let mut records = Vec::with_capacity(raw.len());
    for record in raw {
        match T::try_from(record) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping malformed record");
            }
        }
    }

    Ok(records)
}
