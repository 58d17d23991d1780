//! Calendar helpers for the month-by-month download loop: the [`Month`] value,
//! the derived [`MonthWindow`] date range, and the [`months_between`] enumerator.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar month of a specific year: `Month(year, month)` with `month` in `1..=12`.
///
/// Ordering is chronological because the year is compared first.
///
/// # Examples
///
/// ```
/// use meteo_archive::Month;
///
/// let january = Month(2024, 1);
/// assert_eq!(january.to_string(), "2024-01");
/// assert!(january < Month(2024, 2));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn year(self) -> i32 {
        self.0
    }

    pub fn month(self) -> u32 {
        self.1
    }

    /// First day of the month, or `None` if the month number is outside `1..=12`.
    pub fn start_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, 1)
    }

    /// Last day of the month, or `None` if the month number is outside `1..=12`.
    pub fn end_date(self) -> Option<NaiveDate> {
        end_date(self.0, self.1)
    }

    /// Resolves the inclusive date range covered by this month.
    pub fn window(self) -> Option<MonthWindow> {
        Some(MonthWindow {
            month: self,
            start_date: self.start_date()?,
            end_date: self.end_date()?,
        })
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// Inclusive date range of one calendar month, as sent to the archive API.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    pub month: Month,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl MonthWindow {
    /// Number of days in the window, both ends included.
    pub fn days(&self) -> u32 {
        self.end_date.day()
    }
}

/// Number of days in `month` of `year` (proleptic Gregorian calendar).
pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

/// Last calendar day of the given month.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use meteo_archive::end_date;
///
/// assert_eq!(end_date(2024, 2), NaiveDate::from_ymd_opt(2024, 2, 29));
/// assert_eq!(end_date(2023, 2), NaiveDate::from_ymd_opt(2023, 2, 28));
/// assert_eq!(end_date(2023, 13), None);
/// ```
pub fn end_date(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)
}

/// Enumerates every month from January of `start_year` to December of `end_year`
/// in chronological order.
///
/// The iterator is lazy and `Clone`, so the same range can be walked again. An
/// inverted range yields nothing.
pub fn months_between(start_year: i32, end_year: i32) -> impl Iterator<Item = Month> + Clone {
    (start_year..=end_year).flat_map(|year| (1..=12).map(move |month| Month(year, month)))
}
