use crate::archive::error::ClientSetupError;
use crate::areas::error::AreaRegistryError;
use crate::types::hourly_variable::VariableTableError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a run before any month is processed.
#[derive(Debug, Error)]
pub enum MeteoArchiveError {
    #[error(transparent)]
    AreaRegistry(#[from] AreaRegistryError),

    #[error(transparent)]
    ClientSetup(#[from] ClientSetupError),

    #[error("Invalid hourly variable table")]
    VariableTable(#[from] VariableTableError),

    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),
}
