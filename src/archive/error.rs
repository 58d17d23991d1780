use crate::types::hourly_variable::HourlyVariable;
use thiserror::Error;

/// Failure of a single archive call. Never fatal to a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest_middleware::Error),

    #[error("Failed to read response body from {0}")]
    Body(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Archive rejected {url} with status {status}: {reason}")]
    Upstream {
        url: String,
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("Unexpected response shape from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No hourly data returned for {url}")]
    NoData { url: String },

    #[error("Time axis from {url} is not evenly spaced")]
    IrregularTimeAxis { url: String },

    #[error("Response from {url} has no series for '{variable}'")]
    MissingVariable {
        url: String,
        variable: HourlyVariable,
    },
}

impl FetchError {
    /// True for the "upstream had nothing for this request" condition.
    pub fn is_no_data(&self) -> bool {
        matches!(self, FetchError::NoData { .. })
    }
}

/// Failure to set up the HTTP client. Fatal, happens before the first request.
#[derive(Debug, Error)]
pub enum ClientSetupError {
    #[error("Invalid archive endpoint '{0}'")]
    InvalidUrl(String, #[source] url::ParseError),

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
