use crate::archive::error::FetchError;
use crate::archive::request::ArchiveRequest;
use crate::archive::response::HourlyResponse;

/// Anything that can answer an archive request with an hourly time series.
///
/// [`crate::ArchiveClient`] is the HTTP implementation; tests and offline runs
/// can plug in an in-memory source.
#[allow(async_fn_in_trait)]
pub trait ArchiveSource {
    async fn fetch(&self, request: &ArchiveRequest) -> Result<HourlyResponse, FetchError>;
}
