//! Pipeline error types

use dashboard_common::StoreError;
use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Terminal error reported by one pipeline stage
#[derive(Error, Debug)]
pub enum IngestError {
    /// The input could not be read or framed into lines
    #[error("error in scanning gff3 file: {0}")]
    Scan(#[from] LinesCodecError),

    /// A line selected for `feature_type` could not be turned into a record
    #[error("malformed {feature_type} record on line {line}: {source}")]
    Parse {
        feature_type: String,
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("error in json encoding of {field}: {source}")]
    Serialize {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("error in storing {field} under {key}: {source}")]
    Store {
        key: String,
        field: String,
        #[source]
        source: StoreError,
    },

    /// A stage task panicked before it could report an outcome
    #[error("{stage} stage panicked")]
    StagePanicked { stage: &'static str },

    /// A stage task was cancelled by the runtime before it finished
    #[error("{stage} stage was cancelled")]
    StageCancelled { stage: &'static str },
}

/// Why a selected GFF3 line could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected at least {expected} columns, found {found}")]
    MissingColumn { expected: usize, found: usize },

    #[error("{column} is not an integer: {value:?}")]
    InvalidCoordinate { column: &'static str, value: String },

    #[error("attribute #{position} is missing")]
    MissingAttribute { position: usize },

    #[error("attribute {token:?} has no '=' separator")]
    MalformedAttribute { token: String },

    #[error("length of region {start}..{end} does not fit in 64 bits")]
    LengthOverflow { start: i64, end: i64 },
}
