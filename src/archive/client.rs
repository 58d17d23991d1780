//! HTTP implementation of [`ArchiveSource`] for the Open-Meteo archive API.
//!
//! Requests go through a `reqwest-middleware` stack: the response cache sits on
//! the outside, so a cache hit never reaches the network, and the transient-error
//! retry sits inside it, wrapping only real round trips.

use crate::archive::error::{ClientSetupError, FetchError};
use crate::archive::request::ArchiveRequest;
use crate::archive::response::{ApiErrorBody, HourlyResponse, RawArchiveResponse};
use crate::archive::source::ArchiveSource;
use crate::config::{CachePolicy, DownloadConfig};
use http_cache_reqwest::{CACacheManager, Cache, CacheMode, HttpCache, HttpCacheOptions};
use log::{debug, warn};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use std::path::Path;
use std::time::Duration;
use url::Url;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Client for the archive endpoint configured in [`DownloadConfig`].
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use meteo_archive::{ArchiveClient, ArchiveRequest, ArchiveSource, DownloadConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ArchiveClient::new(&DownloadConfig::default())?;
/// let request = ArchiveRequest::new(
///     52.2,
///     21.0,
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
/// );
/// let response = client.fetch(&request).await?;
/// println!("{} hourly steps", response.hourly.variables[0].len());
/// # Ok(())
/// # }
/// ```
pub struct ArchiveClient {
    http: ClientWithMiddleware,
    endpoint: Url,
}

impl ArchiveClient {
    pub fn new(config: &DownloadConfig) -> Result<Self, ClientSetupError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientSetupError::HttpClient)?;
        Self::with_http_client(config, client)
    }

    /// Wraps an already configured `reqwest` client in the cache and retry layers.
    pub fn with_http_client(
        config: &DownloadConfig,
        client: Client,
    ) -> Result<Self, ClientSetupError> {
        let endpoint = Url::parse(&config.archive_url)
            .map_err(|e| ClientSetupError::InvalidUrl(config.archive_url.clone(), e))?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(config.retry_base_delay.min(MAX_BACKOFF), MAX_BACKOFF)
            .base(2)
            .build_with_max_retries(config.max_retries);

        let builder = ClientBuilder::new(client);
        let builder = match cache_mode(config.cache_policy) {
            Some(mode) => builder.with(Cache(HttpCache {
                mode,
                manager: cache_manager(&config.cache_dir),
                options: HttpCacheOptions::default(),
            })),
            None => builder,
        };
        let http = builder
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { http, endpoint })
    }
}

fn cache_mode(policy: CachePolicy) -> Option<CacheMode> {
    match policy {
        // Stores every 200 response and serves it regardless of staleness.
        CachePolicy::Forever => Some(CacheMode::IgnoreRules),
        CachePolicy::HttpSemantics => Some(CacheMode::Default),
        CachePolicy::Disabled => None,
    }
}

fn cache_manager(cache_dir: &Path) -> CACacheManager {
    CACacheManager::new(cache_dir.to_path_buf(), false)
}

impl ArchiveSource for ArchiveClient {
    async fn fetch(&self, request: &ArchiveRequest) -> Result<HourlyResponse, FetchError> {
        let url = request.url(&self.endpoint);
        debug!("Requesting {}", url);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(url.to_string(), e))?;

        if !status.is_success() {
            warn!("HTTP error {} for {}", status, url);
            return Err(match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(api_error) => FetchError::Upstream {
                    url: url.to_string(),
                    status,
                    reason: api_error.reason,
                },
                Err(_) => FetchError::HttpStatus {
                    url: url.to_string(),
                    status,
                },
            });
        }

        let raw: RawArchiveResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode {
                url: url.to_string(),
                source: e,
            })?;
        raw.into_response(url.as_str())
    }
}
