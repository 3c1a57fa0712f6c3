//! Run-level error model.

use dynaload_types::{ConversionError, StoreError};

/// Errors that abort a load run.
///
/// Conversion failures only reach this type when the run does not tolerate
/// them; tolerated ones become skip notices instead.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("line {line}: attribute '{attribute}': {source}")]
    Conversion {
        line: u64,
        attribute: String,
        #[source]
        source: ConversionError,
    },

    #[error("line {line}: primary key attribute '{attribute}' is missing")]
    MissingKeyAttribute { line: u64, attribute: String },

    /// The store rejected, throttled, or dropped part of a batch.
    #[error("batch write to table '{table}' failed: {source}")]
    BackendWrite {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("could not resolve key schema of table '{table}': {source}")]
    KeySchema {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid job configuration: {0}")]
    Config(String),
}

impl LoadError {
    /// True when the underlying store failure is capacity related.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        match self {
            Self::BackendWrite { source, .. } | Self::KeySchema { source, .. } => {
                source.is_throttling()
            }
            _ => false,
        }
    }
}
