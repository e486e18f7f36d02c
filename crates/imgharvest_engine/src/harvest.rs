use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use imgharvest_core::{Outcome, SearchSession, SessionError, TerminalReason};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::controller::{ControllerSettings, PaginationController};
use crate::download::Downloader;
use crate::fetch::{FetchSettings, ReqwestFetcher};
use crate::filename::sanitize_component;
use crate::manifest::write_manifest;
use crate::persist::{prepare_query_dir, PersistError};
use crate::progress::ProgressSink;
use crate::{DownloadOptions, FetchError, Fetcher, HarvestReport};

/// Conditions that stop an invocation before any page is requested.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("invalid parameters: {0}")]
    Session(#[from] SessionError),
    #[error("failed to create directory: {0}")]
    Directory(#[from] PersistError),
    #[error("failed to set up http client: {0}")]
    Client(#[from] FetchError),
}

/// Run a full session with the default reqwest fetcher.
pub async fn run_harvest(
    options: &DownloadOptions,
    sink: Option<Arc<dyn ProgressSink>>,
    cancel: &CancellationToken,
) -> Result<HarvestReport, HarvestError> {
    let session = options.to_session()?;
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::with_timeout(
        session.timeout(),
    ))?);
    harvest_session(session, options, fetcher, sink, cancel).await
}

/// Run a full session against the given fetcher.
///
/// Directory setup failures are fatal; everything after that yields a report,
/// even when fewer images than requested could be saved.
pub async fn run_harvest_with(
    options: &DownloadOptions,
    fetcher: Arc<dyn Fetcher>,
    sink: Option<Arc<dyn ProgressSink>>,
    cancel: &CancellationToken,
) -> Result<HarvestReport, HarvestError> {
    let session = options.to_session()?;
    harvest_session(session, options, fetcher, sink, cancel).await
}

async fn harvest_session(
    session: SearchSession,
    options: &DownloadOptions,
    fetcher: Arc<dyn Fetcher>,
    sink: Option<Arc<dyn ProgressSink>>,
    cancel: &CancellationToken,
) -> Result<HarvestReport, HarvestError> {
    // Force-replace must not wipe a folder that will never be refilled.
    if cancel.is_cancelled() {
        engine_warn!("Session for '{}' cancelled before start", session.query());
        return Ok(cancelled_report(options, &session));
    }

    let session = Arc::new(session);
    let image_dir = prepare_query_dir(&options.output_dir, session.query(), options.force_replace)?;
    engine_info!("Downloading Images to {}", image_dir.display());

    let downloader = Downloader::new(fetcher.clone(), image_dir, session.image_prefix());
    let settings = ControllerSettings {
        search_base: options.search_base.clone(),
        concurrency: options.concurrency,
        verbose: options.verbose,
    };
    let controller = PaginationController::new(session.clone(), settings, fetcher, downloader, sink);
    let report = controller.run(cancel).await;

    if options.manifest {
        if let Err(err) = write_manifest(session.query(), &report) {
            engine_warn!("Failed to write manifest for '{}': {}", session.query(), err);
        }
    }
    Ok(report)
}

/// Report for a session that never started; nothing on disk was touched.
fn cancelled_report(options: &DownloadOptions, session: &SearchSession) -> HarvestReport {
    HarvestReport {
        outcome: Outcome {
            downloaded: 0,
            pages_requested: 0,
            reason: TerminalReason::Cancelled,
        },
        image_dir: options.output_dir.join(sanitize_component(session.query())),
        images: Vec::new(),
    }
}
