//! Run driver: walks every month of the configured range and, inside each
//! month, every area of the registry in file order.
//!
//! Only startup problems are fatal. A failed area is recorded and skipped, a
//! month that fails to write is recorded and the next month starts.

use crate::archive::client::ArchiveClient;
use crate::archive::request::ArchiveRequest;
use crate::archive::source::ArchiveSource;
use crate::areas::loader::load_areas;
use crate::config::DownloadConfig;
use crate::error::MeteoArchiveError;
use crate::table::error::{NormalizeError, WriteError};
use crate::table::normalize::normalize_fetched;
use crate::table::writer::{MonthWrite, MonthlyWriter};
use crate::types::area::AreaRecord;
use crate::types::hourly_variable::HourlyVariable;
use crate::types::month::{months_between, Month};
use crate::utils::{ensure_dir_exists, error_chain};
use log::{error, info, warn};
use polars::prelude::DataFrame;

/// One area that contributed nothing to a month.
#[derive(Debug)]
pub struct Failure {
    pub area: String,
    pub month: Month,
    pub error: NormalizeError,
}

impl Failure {
    /// True when the archive answered but had no data for the request.
    pub fn is_no_data(&self) -> bool {
        matches!(&self.error, NormalizeError::NoResponse { source, .. } if source.is_no_data())
    }
}

/// What happened to one month's file.
#[derive(Debug)]
pub struct MonthReport {
    pub month: Month,
    /// Areas whose table went into the file.
    pub areas_with_data: usize,
    pub outcome: Result<MonthWrite, WriteError>,
}

/// Outcome of a full run, in processing order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub months: Vec<MonthReport>,
    pub failures: Vec<Failure>,
}

impl RunSummary {
    pub fn files_written(&self) -> usize {
        self.months
            .iter()
            .filter(|report| matches!(report.outcome, Ok(MonthWrite::Written { .. })))
            .count()
    }

    pub fn rows_written(&self) -> usize {
        self.months
            .iter()
            .map(|report| match report.outcome {
                Ok(MonthWrite::Written { rows, .. }) => rows,
                _ => 0,
            })
            .sum()
    }

    pub fn write_failures(&self) -> impl Iterator<Item = (Month, &WriteError)> {
        self.months
            .iter()
            .filter_map(|report| report.outcome.as_ref().err().map(|e| (report.month, e)))
    }
}

/// Downloads hourly archive data for every (month, area) pair of a
/// [`DownloadConfig`] and writes one CSV per month.
///
/// # Examples
///
/// ```no_run
/// use meteo_archive::{DownloadConfig, Downloader};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DownloadConfig::builder().start_year(2023).end_year(2023).build();
/// let summary = Downloader::new(config)?.run().await?;
/// println!("{} files written", summary.files_written());
/// # Ok(())
/// # }
/// ```
pub struct Downloader<S = ArchiveClient> {
    config: DownloadConfig,
    source: S,
    writer: MonthlyWriter,
}

impl Downloader<ArchiveClient> {
    /// Downloader backed by the HTTP archive client.
    pub fn new(config: DownloadConfig) -> Result<Self, MeteoArchiveError> {
        let client = ArchiveClient::new(&config)?;
        Ok(Self::with_source(config, client))
    }
}

impl<S: ArchiveSource> Downloader<S> {
    pub fn with_source(config: DownloadConfig, source: S) -> Self {
        let writer = MonthlyWriter::new(&config.output_dir);
        Self {
            config,
            source,
            writer,
        }
    }

    /// Runs the whole range. Returns an error only if the variable table is
    /// invalid, a working directory cannot be created, or the area registry
    /// cannot be loaded; in all three cases nothing has been fetched.
    pub async fn run(&self) -> Result<RunSummary, MeteoArchiveError> {
        HourlyVariable::validate_table()?;
        ensure_dir_exists(&self.config.output_dir)
            .await
            .map_err(|e| MeteoArchiveError::OutputDirCreation(self.config.output_dir.clone(), e))?;
        ensure_dir_exists(&self.config.cache_dir)
            .await
            .map_err(|e| MeteoArchiveError::CacheDirCreation(self.config.cache_dir.clone(), e))?;

        let areas = load_areas(&self.config.areas_csv)?;

        let mut summary = RunSummary::default();
        for month in months_between(self.config.start_year, self.config.end_year) {
            let report = self.process_month(month, &areas, &mut summary.failures).await;
            summary.months.push(report);
        }
        Ok(summary)
    }

    async fn process_month(
        &self,
        month: Month,
        areas: &[AreaRecord],
        failures: &mut Vec<Failure>,
    ) -> MonthReport {
        info!("Processing data for {}...", month);

        let mut tables: Vec<DataFrame> = Vec::with_capacity(areas.len());
        for area in areas {
            match self.process_area(area, month).await {
                Ok(table) => tables.push(table),
                Err(e) => {
                    let failure = Failure {
                        area: area.name.clone(),
                        month,
                        error: e,
                    };
                    if failure.is_no_data() {
                        warn!(
                            "No response for {} ({}, {}) in {}",
                            area.name, area.latitude, area.longitude, month
                        );
                    } else {
                        error!(
                            "Failed to process {} {}: {}",
                            area.name,
                            month,
                            error_chain(&failure.error)
                        );
                    }
                    failures.push(failure);
                }
            }
            tokio::time::sleep(self.config.request_delay).await;
        }

        let areas_with_data = tables.len();
        let outcome = self.writer.write(month, tables).await;
        match &outcome {
            Ok(MonthWrite::Written { .. }) => {}
            Ok(MonthWrite::NoData) => info!("No data to save for {}.", month),
            Err(e) => error!("Failed to save data for {}: {}", month, error_chain(e)),
        }
        MonthReport {
            month,
            areas_with_data,
            outcome,
        }
    }

    async fn process_area(
        &self,
        area: &AreaRecord,
        month: Month,
    ) -> Result<DataFrame, NormalizeError> {
        let window = month.window().ok_or(NormalizeError::InvalidMonth {
            area: area.name.clone(),
            month,
        })?;
        info!(
            "Fetching {} days of data from the archive for {} {}...",
            window.days(),
            area.name,
            month
        );

        let request = ArchiveRequest::for_area(area, &window);
        let fetched = self.source.fetch(&request).await;
        normalize_fetched(&area.name, month, fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::error::FetchError;
    use crate::archive::response::HourlyResponse;
    use crate::config::CachePolicy;
    use crate::table::test_support::constant_response;
    use std::error::Error;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Answers every request with a full month of constant values, except for
    /// the listed latitudes, which get `NoData`.
    #[derive(Default)]
    struct MockSource {
        no_data_latitudes: Vec<f64>,
        broken_latitudes: Vec<f64>,
        requests: Mutex<Vec<ArchiveRequest>>,
    }

    impl MockSource {
        fn requests(&self) -> Vec<ArchiveRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ArchiveSource for MockSource {
        async fn fetch(&self, request: &ArchiveRequest) -> Result<HourlyResponse, FetchError> {
            self.requests.lock().unwrap().push(*request);
            if self.no_data_latitudes.contains(&request.latitude) {
                return Err(FetchError::NoData {
                    url: "mock://archive".to_string(),
                });
            }
            let start = request
                .start_date
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc()
                .timestamp();
            let days = (request.end_date - request.start_date).num_days() as usize + 1;
            let mut response = constant_response(start, days * 24, 5.0);
            if self.broken_latitudes.contains(&request.latitude) {
                response.hourly.variables[3].truncate(1);
            }
            Ok(response)
        }
    }

    fn config(dir: &Path, start_year: i32, end_year: i32) -> DownloadConfig {
        DownloadConfig::builder()
            .areas_csv(dir.join("areas.csv"))
            .output_dir(dir.join("out"))
            .cache_dir(dir.join("cache"))
            .start_year(start_year)
            .end_year(end_year)
            .request_delay(Duration::ZERO)
            .cache_policy(CachePolicy::Disabled)
            .build()
    }

    fn mock_downloader(dir: &Path, start_year: i32, end_year: i32) -> Downloader<MockSource> {
        Downloader::with_source(config(dir, start_year, end_year), MockSource::default())
    }

    fn write_areas(dir: &Path, rows: &str) -> std::io::Result<()> {
        std::fs::write(
            dir.join("areas.csv"),
            format!("area,latitude,longitude\n{rows}"),
        )
    }

    #[tokio::test]
    async fn test_run_walks_months_then_areas() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_areas(dir.path(), "Wola,52.23,20.95\nMokotow,52.19,21.03\n")?;
        let downloader = mock_downloader(dir.path(), 2024, 2024);

        let summary = downloader.run().await?;

        assert!(summary.failures.is_empty());
        assert_eq!(summary.months.len(), 12);
        assert_eq!(summary.files_written(), 12);
        assert_eq!(summary.rows_written(), 366 * 24 * 2);
        let february = &summary.months[1];
        assert_eq!(february.month, Month(2024, 2));
        assert_eq!(february.areas_with_data, 2);
        assert!(matches!(
            february.outcome,
            Ok(MonthWrite::Written { rows: 1392, .. })
        ));

        let requests = downloader.source.requests();
        assert_eq!(requests.len(), 24);
        assert_eq!(requests[0].latitude, 52.23);
        assert_eq!(requests[1].latitude, 52.19);
        assert_eq!(requests[2].latitude, 52.23);
        assert_eq!(requests[2].start_date.to_string(), "2024-02-01");
        assert_eq!(requests[2].end_date.to_string(), "2024-02-29");
        assert!(dir.path().join("out/open_meteo_2024_12.csv").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_area_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_areas(dir.path(), "Wola,52.23,20.95\nOchota,52.21,20.97\nMokotow,52.19,21.03\n")?;
        let source = MockSource {
            no_data_latitudes: vec![52.23],
            broken_latitudes: vec![52.21],
            ..Default::default()
        };
        let downloader = Downloader::with_source(config(dir.path(), 2023, 2023), source);

        let summary = downloader.run().await?;

        assert_eq!(summary.failures.len(), 24);
        assert!(summary.failures[0].is_no_data());
        assert_eq!(summary.failures[0].area, "Wola");
        assert!(!summary.failures[1].is_no_data());
        assert!(matches!(summary.failures[1].error, NormalizeError::Frame { .. }));
        assert_eq!(summary.files_written(), 12);
        assert!(summary.months.iter().all(|m| m.areas_with_data == 1));

        let csv = std::fs::read_to_string(dir.path().join("out/open_meteo_2023_01.csv"))?;
        assert_eq!(csv.lines().count(), 1 + 31 * 24);
        assert!(csv.lines().skip(1).all(|line| line.ends_with(",Mokotow")));
        Ok(())
    }

    #[tokio::test]
    async fn test_month_without_data_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_areas(dir.path(), "Wola,52.23,20.95\n")?;
        let source = MockSource {
            no_data_latitudes: vec![52.23],
            ..Default::default()
        };
        let downloader = Downloader::with_source(config(dir.path(), 2024, 2024), source);

        let summary = downloader.run().await?;

        assert_eq!(summary.files_written(), 0);
        assert!(summary
            .months
            .iter()
            .all(|m| matches!(m.outcome, Ok(MonthWrite::NoData))));
        assert_eq!(std::fs::read_dir(dir.path().join("out"))?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_invalid_endpoint_fails_setup() {
        let config = DownloadConfig::builder().archive_url("not a url").build();

        let result = Downloader::new(config);

        assert!(matches!(result, Err(MeteoArchiveError::ClientSetup(..))));
    }

    #[tokio::test]
    async fn test_missing_registry_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let downloader = mock_downloader(dir.path(), 2024, 2024);

        let result = downloader.run().await;

        assert!(matches!(result, Err(MeteoArchiveError::AreaRegistry(..))));
        assert!(downloader.source.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_uncreatable_output_dir_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_areas(dir.path(), "Wola,52.23,20.95\n")?;
        std::fs::write(dir.path().join("out"), "not a directory")?;
        let downloader = mock_downloader(dir.path(), 2024, 2024);

        let result = downloader.run().await;

        assert!(matches!(result, Err(MeteoArchiveError::OutputDirCreation(..))));
        assert!(downloader.source.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_range_does_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        write_areas(dir.path(), "Wola,52.23,20.95\n")?;
        let downloader = mock_downloader(dir.path(), 2025, 2024);

        let summary = downloader.run().await?;

        assert!(summary.months.is_empty());
        assert!(downloader.source.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_continues_with_next_month() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        write_areas(dir.path(), "Wola,52.23,20.95\n")?;
        let downloader = mock_downloader(dir.path(), 2024, 2024);
        // A directory squatting on January's file name makes the rename fail.
        std::fs::create_dir_all(dir.path().join("out/open_meteo_2024_01.csv/blocker"))?;

        let summary = downloader.run().await?;

        assert_eq!(summary.write_failures().count(), 1);
        assert_eq!(summary.write_failures().next().map(|(m, _)| m), Some(Month(2024, 1)));
        assert_eq!(summary.files_written(), 11);
        Ok(())
    }
}
