use crate::areas::error::AreaRegistryError;
use crate::types::area::AreaRecord;
use log::info;
use polars::prelude::*;
use std::path::Path;

const COL_AREA: &str = "area";
const COL_LATITUDE: &str = "latitude";
const COL_LONGITUDE: &str = "longitude";

/// Reads the area registry: a headered CSV with at least the columns `area`,
/// `latitude` and `longitude`. Extra columns are ignored and column order does
/// not matter.
///
/// Any unreadable file, missing column or empty/non-numeric cell fails the
/// whole registry; there is no partial result.
pub fn load_areas(path: &Path) -> Result<Vec<AreaRecord>, AreaRegistryError> {
    std::fs::metadata(path).map_err(|e| AreaRegistryError::Open(path.to_path_buf(), e))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| AreaRegistryError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?
        .finish()
        .map_err(|e| AreaRegistryError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let areas = records_from_frame(&df, path)?;
    info!("Loaded {} areas from {}", areas.len(), path.display());
    Ok(areas)
}

/// Casts a registry column to `dtype`. Cells that do not convert become null
/// and are rejected row by row afterwards.
fn cast_column(
    df: &DataFrame,
    path: &Path,
    column: &'static str,
    dtype: &DataType,
) -> Result<Column, AreaRegistryError> {
    df.column(column)
        .and_then(|c| c.cast(dtype))
        .map_err(|e| AreaRegistryError::MissingColumn {
            path: path.to_path_buf(),
            column,
            source: e,
        })
}

fn records_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<AreaRecord>, AreaRegistryError> {
    let names = cast_column(df, path, COL_AREA, &DataType::String)?;
    let latitudes = cast_column(df, path, COL_LATITUDE, &DataType::Float64)?;
    let longitudes = cast_column(df, path, COL_LONGITUDE, &DataType::Float64)?;

    let missing = |column: &'static str| {
        move |e: PolarsError| AreaRegistryError::MissingColumn {
            path: path.to_path_buf(),
            column,
            source: e,
        }
    };
    let names = names.str().map_err(missing(COL_AREA))?;
    let latitudes = latitudes.f64().map_err(missing(COL_LATITUDE))?;
    let longitudes = longitudes.f64().map_err(missing(COL_LONGITUDE))?;

    let invalid = |column: &'static str, row: usize| AreaRegistryError::InvalidValue {
        path: path.to_path_buf(),
        column,
        row: row + 1,
    };

    names
        .into_iter()
        .zip(latitudes.into_iter())
        .zip(longitudes.into_iter())
        .enumerate()
        .map(|(row, ((name, latitude), longitude))| {
            let name = name
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| invalid(COL_AREA, row))?;
            let latitude = latitude.ok_or_else(|| invalid(COL_LATITUDE, row))?;
            let longitude = longitude.ok_or_else(|| invalid(COL_LONGITUDE, row))?;
            Ok(AreaRecord::new(name, latitude, longitude))
        })
        .collect()
}
