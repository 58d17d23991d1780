//! Decoded archive responses.
//!
//! The archive is queried with `timeformat=unixtime`, so the hourly time axis
//! arrives as epoch seconds. It is reduced to the `(start, end, interval)` triple
//! the normalizer expands again, and the variable series are stored positionally
//! in [`HourlyVariable::ALL`] order.

use crate::archive::error::FetchError;
use crate::types::hourly_variable::HourlyVariable;
use serde::Deserialize;
use std::collections::HashMap;

const HOUR_SECONDS: i64 = 3600;

/// Location metadata reported with every response. Informational only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationInfo {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub utc_offset_seconds: i32,
}

/// Hourly time series of one response.
///
/// Timestamps are implied: `time`, `time + interval`, ... up to but excluding
/// `time_end`. `variables[i]` holds the series of `HourlyVariable::ALL[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBlock {
    /// First instant, seconds since the Unix epoch (UTC).
    pub time: i64,
    /// Exclusive end instant, seconds since the Unix epoch (UTC).
    pub time_end: i64,
    /// Step between samples in seconds.
    pub interval: i64,
    pub variables: Vec<Vec<Option<f64>>>,
}

impl HourlyBlock {
    /// Series of the variable at position `index` of the request.
    pub fn variable(&self, index: usize) -> Option<&[Option<f64>]> {
        self.variables.get(index).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyResponse {
    pub location: LocationInfo,
    pub hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArchiveResponse {
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
    #[serde(default)]
    utc_offset_seconds: i32,
    timezone: Option<String>,
    timezone_abbreviation: Option<String>,
    hourly: Option<RawHourly>,
}

#[derive(Debug, Deserialize)]
struct RawHourly {
    time: Vec<i64>,
    #[serde(flatten)]
    series: HashMap<String, Vec<Option<f64>>>,
}

/// Error body returned by the archive with a non-success status.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub reason: String,
}

impl RawArchiveResponse {
    /// Converts the wire shape into an [`HourlyResponse`]; `url` is only used
    /// for error context.
    pub(crate) fn into_response(self, url: &str) -> Result<HourlyResponse, FetchError> {
        let location = LocationInfo {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
            timezone: self.timezone,
            timezone_abbreviation: self.timezone_abbreviation,
            utc_offset_seconds: self.utc_offset_seconds,
        };

        let Some(mut raw) = self.hourly else {
            return Err(FetchError::NoData {
                url: url.to_string(),
            });
        };
        let Some(&time) = raw.time.first() else {
            return Err(FetchError::NoData {
                url: url.to_string(),
            });
        };
        let interval = match raw.time.get(1) {
            Some(&second) => second.checked_sub(time).unwrap_or(0),
            None => HOUR_SECONDS,
        };
        let time_end = time_axis_end(&raw.time, interval).ok_or_else(|| {
            FetchError::IrregularTimeAxis {
                url: url.to_string(),
            }
        })?;

        let variables = HourlyVariable::ALL
            .iter()
            .map(|variable| {
                raw.series
                    .remove(variable.api_name())
                    .ok_or_else(|| FetchError::MissingVariable {
                        url: url.to_string(),
                        variable: *variable,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HourlyResponse {
            location,
            hourly: HourlyBlock {
                time,
                time_end,
                interval,
                variables,
            },
        })
    }
}

/// Exclusive end of an evenly spaced axis: `time[0] + len * interval`.
/// `None` if the spacing is not a constant positive step or the end overflows.
fn time_axis_end(times: &[i64], interval: i64) -> Option<i64> {
    if interval <= 0 || times.windows(2).any(|w| w[1].checked_sub(w[0]) != Some(interval)) {
        return None;
    }
    let len = i64::try_from(times.len()).ok()?;
    times.first()?.checked_add(interval.checked_mul(len)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://archive.test/v1/archive";

    fn body(hourly: &str) -> String {
        format!(
            r#"{{"latitude":52.2,"longitude":21.0,"generationtime_ms":0.5,"utc_offset_seconds":3600,
                "timezone":"Europe/Warsaw","timezone_abbreviation":"CET","elevation":106.0,
                "hourly_units":{{"time":"unixtime"}},"hourly":{hourly}}}"#
        )
    }

    fn decode(json: &str) -> Result<HourlyResponse, FetchError> {
        let raw: RawArchiveResponse = serde_json::from_str(json).expect("valid json");
        raw.into_response(URL)
    }

    #[test]
    fn test_decode_positional_variables() -> Result<(), FetchError> {
        let json = body(
            r#"{"time":[1704063600,1704067200,1704070800],
                "winddirection_10m":[7.0,7.0,null],"windspeed_10m":[6.0,6.0,6.0],
                "snowfall":[5.0,5.0,5.0],"rain":[4.0,4.0,4.0],"precipitation":[3.0,3.0,3.0],
                "relative_humidity_2m":[2.0,2.0,2.0],"temperature_2m":[1.0,1.0,1.0]}"#,
        );

        let response = decode(&json)?;

        assert_eq!(response.hourly.time, 1_704_063_600);
        assert_eq!(response.hourly.interval, 3600);
        assert_eq!(response.hourly.time_end, 1_704_074_400);
        for (i, _) in HourlyVariable::ALL.iter().enumerate().take(6) {
            let series = response.hourly.variable(i).unwrap();
            assert!(series.iter().all(|v| *v == Some(i as f64 + 1.0)));
        }
        assert_eq!(response.hourly.variable(6).unwrap()[2], None);
        assert_eq!(response.location.timezone.as_deref(), Some("Europe/Warsaw"));
        assert_eq!(response.location.utc_offset_seconds, 3600);
        Ok(())
    }

    #[test]
    fn test_decode_empty_time_axis_is_no_data() {
        let json = body(
            r#"{"time":[],"temperature_2m":[],"relative_humidity_2m":[],"precipitation":[],
                "rain":[],"snowfall":[],"windspeed_10m":[],"winddirection_10m":[]}"#,
        );
        assert!(matches!(decode(&json), Err(FetchError::NoData { .. })));
    }

    #[test]
    fn test_decode_missing_hourly_block_is_no_data() {
        let json = r#"{"latitude":52.2,"longitude":21.0}"#;
        assert!(matches!(decode(json), Err(FetchError::NoData { .. })));
    }

    #[test]
    fn test_decode_missing_variable() {
        let json = body(r#"{"time":[0],"temperature_2m":[1.0]}"#);
        assert!(matches!(
            decode(&json),
            Err(FetchError::MissingVariable {
                variable: HourlyVariable::RelativeHumidity2m,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_single_sample_assumes_hourly_interval() -> Result<(), FetchError> {
        let json = body(
            r#"{"time":[7200],"temperature_2m":[1.0],"relative_humidity_2m":[1.0],"precipitation":[1.0],
                "rain":[1.0],"snowfall":[1.0],"windspeed_10m":[1.0],"winddirection_10m":[1.0]}"#,
        );
        let response = decode(&json)?;
        assert_eq!(response.hourly.interval, 3600);
        assert_eq!(response.hourly.time_end, 10_800);
        Ok(())
    }

    #[test]
    fn test_decode_gapped_time_axis_is_rejected() {
        let json = body(
            r#"{"time":[0,3600,3600000000],"temperature_2m":[1.0,1.0,1.0],
                "relative_humidity_2m":[1.0,1.0,1.0],"precipitation":[1.0,1.0,1.0],
                "rain":[1.0,1.0,1.0],"snowfall":[1.0,1.0,1.0],"windspeed_10m":[1.0,1.0,1.0],
                "winddirection_10m":[1.0,1.0,1.0]}"#,
        );
        assert!(matches!(
            decode(&json),
            Err(FetchError::IrregularTimeAxis { .. })
        ));
    }

    #[test]
    fn test_time_axis_end_follows_sample_count() {
        assert_eq!(time_axis_end(&[0, 3600, 7200], 3600), Some(10_800));
        assert_eq!(time_axis_end(&[7200], 3600), Some(10_800));
        assert_eq!(time_axis_end(&[0, 3600, 3_600_000_000], 3600), None);
        assert_eq!(time_axis_end(&[3600, 0], -3600), None);
        assert_eq!(time_axis_end(&[i64::MAX - 1, i64::MAX], 1), None);
    }
}
