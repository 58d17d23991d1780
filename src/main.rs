use log::{error, info, warn};
use meteo_archive::{DownloadConfig, Downloader, MeteoArchiveError, RunSummary};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), MeteoArchiveError> {
    // Info by default, RUST_LOG takes precedence.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DownloadConfig::default();
    info!(
        "Downloading {}..={} for areas in {} into {}",
        config.start_year,
        config.end_year,
        config.areas_csv.display(),
        config.output_dir.display()
    );

    let summary = match download(config).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("{}", e);
            return Err(e);
        }
    };

    for failure in &summary.failures {
        warn!("Missing: {} {}", failure.area, failure.month);
    }
    for (month, e) in summary.write_failures() {
        warn!("Not saved: {} ({})", month, e);
    }
    info!(
        "Done: {} files, {} rows, {} failed area requests",
        summary.files_written(),
        summary.rows_written(),
        summary.failures.len()
    );
    Ok(())
}

async fn download(config: DownloadConfig) -> Result<RunSummary, MeteoArchiveError> {
    Downloader::new(config)?.run().await
}
