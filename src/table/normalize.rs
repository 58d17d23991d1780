use crate::archive::error::FetchError;
use crate::archive::response::HourlyResponse;
use crate::table::error::NormalizeError;
use crate::types::hourly_variable::HourlyVariable;
use crate::types::month::Month;
use chrono::{DateTime, NaiveDateTime};
use log::{debug, info};
use polars::prelude::*;
use thiserror::Error;

pub const COL_TIME: &str = "time";
pub const COL_AREA: &str = "area";

/// Output column order: `time`, the hourly variables in table order, `area`.
pub fn output_columns() -> Vec<&'static str> {
    std::iter::once(COL_TIME)
        .chain(HourlyVariable::ALL.iter().map(|v| v.api_name()))
        .chain(std::iter::once(COL_AREA))
        .collect()
}

/// Expands a `(start, end, interval)` time axis into UTC timestamps.
///
/// The range is half-open: `start` is included, `end` is not.
///
/// # Examples
///
/// ```
/// use meteo_archive::hourly_timestamps;
///
/// let times = hourly_timestamps(0, 3 * 3600, 3600).unwrap();
/// assert_eq!(times.len(), 3);
/// assert_eq!(times[2].to_string(), "1970-01-01 02:00:00");
/// ```
pub fn hourly_timestamps(
    start: i64,
    end: i64,
    interval: i64,
) -> Result<Vec<NaiveDateTime>, TimeAxisError> {
    if interval <= 0 {
        return Err(TimeAxisError::Interval(interval));
    }
    (start..end)
        .step_by(interval as usize)
        .map(|ts| {
            DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc())
                .ok_or(TimeAxisError::Timestamp(ts))
        })
        .collect()
}

/// Invalid `(start, end, interval)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeAxisError {
    #[error("Time axis interval must be positive, got {0} seconds")]
    Interval(i64),
    #[error("Timestamp {0} is out of range")]
    Timestamp(i64),
}

/// Shapes one response into a table with one row per hour and the columns of
/// [`output_columns`]. `area` is repeated on every row.
///
/// Series lengths are not checked up front; a series that does not match the
/// time axis fails table construction.
pub fn normalize(
    area: &str,
    month: Month,
    response: &HourlyResponse,
) -> Result<DataFrame, NormalizeError> {
    info!("Processing data for {} {}...", area, month);

    let location = &response.location;
    debug!(
        "{} {}: grid point ({}, {}), elevation {:?} m, timezone {} ({}), UTC offset {} s",
        area,
        month,
        location.latitude,
        location.longitude,
        location.elevation,
        location.timezone.as_deref().unwrap_or("unknown"),
        location.timezone_abbreviation.as_deref().unwrap_or("-"),
        location.utc_offset_seconds,
    );

    let hourly = &response.hourly;
    let times = hourly_timestamps(hourly.time, hourly.time_end, hourly.interval).map_err(
        |e| match e {
            TimeAxisError::Interval(interval) => NormalizeError::InvalidInterval {
                area: area.to_string(),
                month,
                interval,
            },
            TimeAxisError::Timestamp(timestamp) => NormalizeError::InvalidTimestamp {
                area: area.to_string(),
                month,
                timestamp,
            },
        },
    )?;
    let rows = times.len();

    let mut columns = Vec::with_capacity(HourlyVariable::ALL.len() + 2);
    columns.push(Column::new(COL_TIME.into(), times));
    for variable in HourlyVariable::ALL {
        let series =
            hourly
                .variable(variable.index())
                .ok_or_else(|| NormalizeError::MissingVariable {
                    area: area.to_string(),
                    month,
                    index: variable.index(),
                })?;
        columns.push(Column::new(variable.api_name().into(), series));
    }
    columns.push(Column::new(COL_AREA.into(), vec![area; rows]));

    DataFrame::new(columns).map_err(|e| NormalizeError::Frame {
        area: area.to_string(),
        month,
        source: e,
    })
}

/// Normalizes the outcome of a fetch. A failed fetch yields
/// [`NormalizeError::NoResponse`] carrying the fetch error.
pub fn normalize_fetched(
    area: &str,
    month: Month,
    fetched: Result<HourlyResponse, FetchError>,
) -> Result<DataFrame, NormalizeError> {
    match fetched {
        Ok(response) => normalize(area, month, &response),
        Err(e) => Err(NormalizeError::NoResponse {
            area: area.to_string(),
            month,
            source: e,
        }),
    }
}
