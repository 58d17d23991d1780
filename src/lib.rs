mod archive;
mod areas;
mod config;
mod downloader;
mod error;
mod table;
mod types;
mod utils;

pub use config::*;
pub use downloader::*;
pub use error::MeteoArchiveError;

pub use archive::client::ArchiveClient;
pub use archive::request::ArchiveRequest;
pub use archive::response::{HourlyBlock, HourlyResponse, LocationInfo};
pub use archive::source::ArchiveSource;

pub use areas::loader::load_areas;

pub use table::normalize::{
    hourly_timestamps, normalize, normalize_fetched, output_columns, TimeAxisError, COL_AREA,
    COL_TIME,
};
pub use table::writer::{concat_tables, monthly_file_name, MonthWrite, MonthlyWriter};

pub use types::area::AreaRecord;
pub use types::hourly_variable::{HourlyVariable, VariableTableError};
pub use types::month::{end_date, months_between, Month, MonthWindow};

pub use archive::error::{ClientSetupError, FetchError};
pub use areas::error::AreaRegistryError;
pub use table::error::{NormalizeError, WriteError};
