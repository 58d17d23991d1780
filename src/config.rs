//! Run configuration.
//!
//! Every option has a default matching a plain `areas.csv` → `weather_data/`
//! run for 2024, so `DownloadConfig::default()` is a complete configuration.

use bon::Builder;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_AREAS_CSV: &str = "areas.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "weather_data";
pub const DEFAULT_CACHE_DIR: &str = ".cache";
pub const DEFAULT_START_YEAR: i32 = 2024;
pub const DEFAULT_END_YEAR: i32 = 2024;

/// How long archive responses stay in the on-disk HTTP cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Every successful response is stored and reused forever, whatever its
    /// cache headers say. Reruns of the same range are served from disk.
    #[default]
    Forever,
    /// Follow the HTTP caching headers sent by the archive.
    HttpSemantics,
    /// No response cache at all.
    Disabled,
}

/// Options for a download run.
///
/// # Examples
///
/// ```
/// use meteo_archive::{CachePolicy, DownloadConfig};
/// use std::time::Duration;
///
/// let config = DownloadConfig::builder()
///     .areas_csv("districts.csv")
///     .start_year(2022)
///     .end_year(2023)
///     .request_delay(Duration::from_millis(500))
///     .cache_policy(CachePolicy::HttpSemantics)
///     .build();
///
/// assert_eq!(config.output_dir.to_str(), Some("weather_data"));
/// assert_eq!(config.max_retries, 5);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DownloadConfig {
    /// Area registry CSV with `area`, `latitude` and `longitude` columns.
    #[builder(into, default = PathBuf::from(DEFAULT_AREAS_CSV))]
    pub areas_csv: PathBuf,

    /// Directory receiving one `open_meteo_<year>_<month>.csv` per month.
    #[builder(into, default = PathBuf::from(DEFAULT_OUTPUT_DIR))]
    pub output_dir: PathBuf,

    /// Directory of the HTTP response cache.
    #[builder(into, default = PathBuf::from(DEFAULT_CACHE_DIR))]
    pub cache_dir: PathBuf,

    /// First year to download (inclusive).
    #[builder(default = DEFAULT_START_YEAR)]
    pub start_year: i32,

    /// Last year to download (inclusive).
    #[builder(default = DEFAULT_END_YEAR)]
    pub end_year: i32,

    /// Pause after every area, successful or not.
    #[builder(default = Duration::from_secs(1))]
    pub request_delay: Duration,

    /// Archive endpoint the query string is appended to.
    #[builder(into, default = DEFAULT_ARCHIVE_URL.to_string())]
    pub archive_url: String,

    #[builder(default)]
    pub cache_policy: CachePolicy,

    /// Retries for transient failures (connection errors, 5xx, 429).
    #[builder(default = 5)]
    pub max_retries: u32,

    /// First backoff interval; later ones double.
    #[builder(default = Duration::from_millis(200))]
    pub retry_base_delay: Duration,

    #[builder(default = Duration::from_secs(60))]
    pub request_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
