//! Defines the `Error` and `Result` types that this crate uses.

use std::error::Error;
use std::fmt::Display;
use std::io::Error as IoError;

use tinytemplate::error::Error as TinyTemplateError;

/// The result type that uses [VisError] as the error type.
pub type Result<T> = std::result::Result<T, VisError>;

/// The error type for generating the chart report.
#[derive(Debug)]
pub enum VisError {
    /// A [std::io::Error] encountered while writing the report files.
    Io(IoError),

    /// A [tinytemplate::error::Error] encountered while rendering the
    /// index page template.
    Template(TinyTemplateError),

    /// A [serde_json::Error] encountered while serializing a chart spec.
    Json(serde_json::Error),
}

impl Error for VisError {}

impl Display for VisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let vis_error = "vis error:";

        match self {
            VisError::Io(error) => write!(f, "{vis_error} I/O error: {error}"),
            VisError::Template(error) => write!(f, "{vis_error} template error: {error}"),
            VisError::Json(error) => {
                write!(f, "{vis_error} chart spec serialization error: {error}")
            }
        }
    }
}

impl From<TinyTemplateError> for VisError {
    fn from(error: TinyTemplateError) -> Self {
        VisError::Template(error)
    }
}

impl From<IoError> for VisError {
    fn from(error: IoError) -> Self {
        VisError::Io(error)
    }
}

impl From<serde_json::Error> for VisError {
    fn from(error: serde_json::Error) -> Self {
        VisError::Json(error)
    }
}
