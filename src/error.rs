//! Error types shared by the averager and the tracker.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AggregateError>;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// Input that cannot be treated as text at all.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A value handed to the tracker that is not a finite number.
    #[error("cannot convert {value:?} to a float")]
    Conversion { value: String },

    #[error("operation #{index} failed: {source}")]
    Operation {
        index: usize,
        #[source]
        source: Box<AggregateError>,
    },

    #[error("malformed operation script: {0}")]
    Json(#[from] serde_json::Error),
}
