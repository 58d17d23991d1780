use crate::archive::error::FetchError;
use crate::types::month::Month;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn one area's response into a table.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("No response to process for {area} {month}")]
    NoResponse {
        area: String,
        month: Month,
        #[source]
        source: FetchError,
    },

    #[error("{month} is not a calendar month (requested for {area})")]
    InvalidMonth { area: String, month: Month },

    #[error("Invalid time axis for {area} {month}: interval of {interval} seconds")]
    InvalidInterval {
        area: String,
        month: Month,
        interval: i64,
    },

    #[error("Timestamp {timestamp} out of range for {area} {month}")]
    InvalidTimestamp {
        area: String,
        month: Month,
        timestamp: i64,
    },

    #[error("Response for {area} {month} has no series at variable index {index}")]
    MissingVariable {
        area: String,
        month: Month,
        index: usize,
    },

    #[error("Failed to build table for {area} {month}")]
    Frame {
        area: String,
        month: Month,
        #[source]
        source: PolarsError,
    },
}

/// Failure to persist one month. The run carries on with the next month.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to combine area tables for {month}")]
    Concat {
        month: Month,
        #[source]
        source: PolarsError,
    },

    #[error("I/O error writing '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing '{0}'")]
    Encode(PathBuf, #[source] PolarsError),

    #[error("Background write task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
