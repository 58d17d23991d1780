//! The fixed, ordered set of hourly variables requested from the archive.
//!
//! [`HourlyVariable::ALL`] is the only place the order is defined. The request's
//! `hourly=` directive and the positional extraction of the response both walk
//! this table, so index `i` of a response always belongs to `ALL[i]`.

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// One meteorological quantity sampled once per hour.
///
/// # Examples
///
/// ```
/// use meteo_archive::HourlyVariable;
///
/// assert_eq!(HourlyVariable::ALL[0], HourlyVariable::Temperature2m);
/// assert_eq!(HourlyVariable::Temperature2m.api_name(), "temperature_2m");
/// assert_eq!(HourlyVariable::Temperature2m.index(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyVariable {
    /// Air temperature 2 m above ground, °C.
    Temperature2m,
    /// Relative humidity 2 m above ground, %.
    RelativeHumidity2m,
    /// Total precipitation (rain, showers, snow) of the preceding hour, mm.
    Precipitation,
    /// Liquid precipitation of the preceding hour, mm.
    Rain,
    /// Snowfall of the preceding hour, cm.
    Snowfall,
    /// Wind speed 10 m above ground, km/h.
    WindSpeed10m,
    /// Wind direction 10 m above ground, degrees.
    WindDirection10m,
}

impl HourlyVariable {
    /// Request and column order. Reordering this table reorders both.
    pub const ALL: [HourlyVariable; 7] = [
        HourlyVariable::Temperature2m,
        HourlyVariable::RelativeHumidity2m,
        HourlyVariable::Precipitation,
        HourlyVariable::Rain,
        HourlyVariable::Snowfall,
        HourlyVariable::WindSpeed10m,
        HourlyVariable::WindDirection10m,
    ];

    /// Identifier used by the archive API, which is also the output column name.
    pub fn api_name(self) -> &'static str {
        match self {
            HourlyVariable::Temperature2m => "temperature_2m",
            HourlyVariable::RelativeHumidity2m => "relative_humidity_2m",
            HourlyVariable::Precipitation => "precipitation",
            HourlyVariable::Rain => "rain",
            HourlyVariable::Snowfall => "snowfall",
            HourlyVariable::WindSpeed10m => "windspeed_10m",
            HourlyVariable::WindDirection10m => "winddirection_10m",
        }
    }

    /// Position of this variable in [`HourlyVariable::ALL`].
    pub fn index(self) -> usize {
        // ALL is a permutation of every variant, the search always succeeds.
        Self::ALL
            .iter()
            .position(|v| *v == self)
            .unwrap_or_default()
    }

    /// The comma-joined `hourly=` request directive.
    pub fn request_directive() -> String {
        Self::ALL
            .iter()
            .map(|v| v.api_name())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Checks [`HourlyVariable::ALL`] for duplicated identifiers.
    ///
    /// `validate` also checks the count and the order of a table, but for
    /// `ALL` those hold by construction: the array length is fixed by its type
    /// and `index()` is the position in `ALL`. They only fire for other tables
    /// passed to `validate`.
    pub fn validate_table() -> Result<(), VariableTableError> {
        Self::validate(&Self::ALL)
    }

    fn validate(table: &[HourlyVariable]) -> Result<(), VariableTableError> {
        if table.len() != VARIABLE_COUNT {
            return Err(VariableTableError::Count {
                expected: VARIABLE_COUNT,
                found: table.len(),
            });
        }
        let mut seen = HashSet::with_capacity(table.len());
        for (position, variable) in table.iter().enumerate() {
            if !seen.insert(variable.api_name()) {
                return Err(VariableTableError::Duplicate(variable.api_name()));
            }
            if variable.index() != position {
                return Err(VariableTableError::Order {
                    variable: variable.api_name(),
                    position,
                    index: variable.index(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for HourlyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

const VARIABLE_COUNT: usize = 7;

#[derive(Debug, Error, PartialEq)]
pub enum VariableTableError {
    #[error("Hourly variable table has {found} entries, expected {expected}")]
    Count { expected: usize, found: usize },

    #[error("Hourly variable '{0}' is listed more than once")]
    Duplicate(&'static str),

    #[error("Hourly variable '{variable}' sits at position {position} but resolves to index {index}")]
    Order {
        variable: &'static str,
        position: usize,
        index: usize,
    },
}
