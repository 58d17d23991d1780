use crate::types::area::AreaRecord;
use crate::types::hourly_variable::HourlyVariable;
use crate::types::month::MonthWindow;
use chrono::NaiveDate;
use reqwest::Url;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameters of one archive call: a point and an inclusive date range.
///
/// The variable list is not a parameter; it is always
/// [`HourlyVariable::ALL`] in table order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchiveRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ArchiveRequest {
    pub fn new(latitude: f64, longitude: f64, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            latitude,
            longitude,
            start_date,
            end_date,
        }
    }

    pub fn for_area(area: &AreaRecord, window: &MonthWindow) -> Self {
        Self::new(
            area.latitude,
            area.longitude,
            window.start_date,
            window.end_date,
        )
    }

    /// Query pairs in a fixed order, so identical requests render identical URLs
    /// and share a cache entry.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("start_date", self.start_date.format(DATE_FORMAT).to_string()),
            ("end_date", self.end_date.format(DATE_FORMAT).to_string()),
            ("hourly", HourlyVariable::request_directive()),
            ("timezone", "auto".to_string()),
            ("timeformat", "unixtime".to_string()),
        ]
    }

    pub fn url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        url.query_pairs_mut().extend_pairs(self.query_pairs());
        url
    }
}
