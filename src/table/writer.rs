use crate::table::error::WriteError;
use crate::types::month::Month;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

const FILE_PREFIX: &str = "open_meteo";
/// Timestamps are UTC; the offset is written out explicitly.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

/// File name of the CSV for `month`, e.g. `open_meteo_2024_01.csv`.
pub fn monthly_file_name(month: Month) -> String {
    format!("{}_{:04}_{:02}.csv", FILE_PREFIX, month.year(), month.month())
}

/// Result of writing one month.
#[derive(Debug, Clone, PartialEq)]
pub enum MonthWrite {
    Written { path: PathBuf, rows: usize },
    /// No area produced data; nothing was written.
    NoData,
}

/// Concatenates per-area tables, keeping their order and the order of rows
/// within each table.
pub fn concat_tables(tables: Vec<DataFrame>) -> PolarsResult<DataFrame> {
    let frames: Vec<LazyFrame> = tables.into_iter().map(|df| df.lazy()).collect();
    concat(frames, UnionArgs::default())?.collect()
}

/// Writes combined monthly tables into `output_dir`.
pub struct MonthlyWriter {
    output_dir: PathBuf,
}

impl MonthlyWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn path_for(&self, month: Month) -> PathBuf {
        self.output_dir.join(monthly_file_name(month))
    }

    /// Combines `tables` and writes them as the CSV for `month`, replacing any
    /// existing file. An empty `tables` writes nothing and returns
    /// [`MonthWrite::NoData`].
    ///
    /// The file is written to a temporary sibling first and renamed into
    /// place, so a failed write never leaves a truncated CSV behind.
    pub async fn write(
        &self,
        month: Month,
        tables: Vec<DataFrame>,
    ) -> Result<MonthWrite, WriteError> {
        if tables.is_empty() {
            return Ok(MonthWrite::NoData);
        }

        let path = self.path_for(month);
        let target = path.clone();
        let output_dir = self.output_dir.clone();

        let rows = task::spawn_blocking(move || {
            let mut combined =
                concat_tables(tables).map_err(|e| WriteError::Concat { month, source: e })?;
            write_csv(&mut combined, &output_dir, &target)?;
            Ok::<usize, WriteError>(combined.height())
        })
        .await??;

        info!("Saved {} rows for {} to {}", rows, month, path.display());
        Ok(MonthWrite::Written { path, rows })
    }
}

fn write_csv(df: &mut DataFrame, output_dir: &Path, path: &Path) -> Result<(), WriteError> {
    let mut file =
        NamedTempFile::new_in(output_dir).map_err(|e| WriteError::Io(path.to_path_buf(), e))?;
    CsvWriter::new(file.as_file_mut())
        .include_header(true)
        .with_datetime_format(Some(TIME_FORMAT.to_string()))
        .finish(df)
        .map_err(|e| WriteError::Encode(path.to_path_buf(), e))?;
    file.persist(path)
        .map_err(|e| WriteError::Io(path.to_path_buf(), e.error))?;
    Ok(())
}
