use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AreaRegistryError {
    #[error("Failed to open area registry '{0}'")]
    Open(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse area registry '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Area registry '{path}' has no usable '{column}' column")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
        #[source]
        source: PolarsError,
    },

    #[error("Area registry '{path}' has an empty or invalid '{column}' value in data row {row}")]
    InvalidValue {
        path: PathBuf,
        column: &'static str,
        row: usize,
    },
}
