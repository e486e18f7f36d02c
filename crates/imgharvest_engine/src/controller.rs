use std::collections::VecDeque;
use std::sync::Arc;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{FuturesUnordered, StreamExt};
use imgharvest_core::{
    build_page_url, Admission, DownloadResult, Phase, SearchSession, SessionState,
};
use tokio_util::sync::CancellationToken;

use crate::download::{Downloader, FetchedImage};
use crate::extract::{LinkExtractor, MarkerLinkExtractor};
use crate::page::decode_page;
use crate::progress::{ProgressReporter, ProgressSink};
use crate::{FetchError, Fetcher, HarvestReport, SavedImage};

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub search_base: String,
    /// Upper bound on concurrent image downloads; `1` downloads sequentially.
    pub concurrency: usize,
    pub verbose: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            search_base: imgharvest_core::DEFAULT_SEARCH_BASE.to_string(),
            concurrency: 4,
            verbose: true,
        }
    }
}

enum Drain {
    Finished,
    Cancelled,
}

/// Drives one session: request page, extract, filter, dispatch, repeat.
///
/// Session state is owned here. Download workers only return results; the
/// counter, the seen set and the reporter are touched from this task alone.
pub struct PaginationController {
    session: Arc<SearchSession>,
    settings: ControllerSettings,
    fetcher: Arc<dyn Fetcher>,
    extractor: Box<dyn LinkExtractor>,
    downloader: Downloader,
    reporter: ProgressReporter,
    state: SessionState,
    saved: Vec<SavedImage>,
}

impl PaginationController {
    pub fn new(
        session: Arc<SearchSession>,
        settings: ControllerSettings,
        fetcher: Arc<dyn Fetcher>,
        downloader: Downloader,
        sink: Option<Arc<dyn ProgressSink>>,
    ) -> Self {
        let state = SessionState::new(&session);
        Self {
            session,
            settings,
            fetcher,
            extractor: Box::new(MarkerLinkExtractor),
            downloader,
            reporter: ProgressReporter::new(sink),
            state,
            saved: Vec::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn LinkExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub async fn run(mut self, cancel: &CancellationToken) -> HarvestReport {
        if !self.session.badsites().is_empty() {
            engine_info!(
                "Download links will not include: {}",
                self.session.badsites().join(", ")
            );
        }

        let mut page_body = String::new();
        let mut links = Vec::new();
        let mut admitted = Vec::new();

        self.state.start();
        loop {
            match self.state.phase() {
                Phase::Requesting => {
                    if cancel.is_cancelled() {
                        self.state.cancel();
                        continue;
                    }
                    let fetched = tokio::select! {
                        _ = cancel.cancelled() => None,
                        result = self.request_page() => Some(result),
                    };
                    match fetched {
                        Some(Ok(body)) => {
                            page_body = body;
                            self.state.page_fetched();
                        }
                        Some(Err(err)) => {
                            engine_error!("Error making request to search engine: {}", err);
                            self.state.page_failed();
                        }
                        None => {
                            engine_warn!("Session for '{}' cancelled", self.session.query());
                            self.state.cancel();
                        }
                    }
                }
                Phase::Extracting => {
                    links = self.extractor.extract(&page_body);
                    page_body.clear();
                    if links.is_empty() {
                        engine_info!("No more images are available.");
                    } else if self.settings.verbose {
                        engine_info!(
                            "Indexed {} Images on Page {}.",
                            links.len(),
                            self.state.cursor().page_index() + 1
                        );
                    }
                    self.state.links_extracted(links.len());
                }
                Phase::Filtering => {
                    let verbose = self.settings.verbose;
                    admitted = self.state.filter_links(std::mem::take(&mut links), |url, why| {
                        match why {
                            Admission::Badsite(site) if verbose => {
                                engine_info!("Link included in badsites ({}): {}", site, url)
                            }
                            Admission::AlreadySeen => engine_debug!("Skipping seen link {}", url),
                            _ => {}
                        }
                    });
                }
                Phase::Dispatching => {
                    match self.dispatch(std::mem::take(&mut admitted), cancel).await {
                        Drain::Finished => {
                            self.state.page_drained();
                        }
                        Drain::Cancelled => {
                            engine_warn!("Session for '{}' cancelled", self.session.query());
                            self.state.cancel();
                        }
                    }
                }
                Phase::Idle | Phase::Done | Phase::Aborted | Phase::Cancelled => break,
            }
        }

        let outcome = self.state.outcome();
        engine_info!("Done. Downloaded {} images.", outcome.downloaded);
        HarvestReport {
            outcome,
            image_dir: self.downloader.destination_dir().to_path_buf(),
            images: self.saved,
        }
    }

    async fn request_page(&mut self) -> Result<String, FetchError> {
        let page_index = self.state.begin_request();
        if self.settings.verbose {
            engine_info!("Indexing page: {}", page_index + 1);
        }
        let url = build_page_url(&self.settings.search_base, &self.session, page_index);
        engine_debug!("GET {}", url);
        let output = self.fetcher.fetch(&url).await?;
        Ok(decode_page(
            &output.bytes,
            output.metadata.content_type.as_deref(),
        ))
    }

    /// Download the admitted links of one page through a bounded pool.
    ///
    /// A slot is reserved before each dispatch, so the number in flight never
    /// exceeds what is still missing to reach the limit.
    async fn dispatch(&mut self, admitted: Vec<String>, cancel: &CancellationToken) -> Drain {
        let mut queue: VecDeque<String> = admitted.into();
        let mut in_flight: FuturesUnordered<BoxFuture<'static, FetchOutcome>> =
            FuturesUnordered::new();
        let concurrency = self.settings.concurrency.max(1);

        loop {
            if cancel.is_cancelled() {
                return Drain::Cancelled;
            }
            while in_flight.len() < concurrency && !queue.is_empty() && self.state.try_reserve() {
                if let Some(url) = queue.pop_front() {
                    in_flight.push(fetch_task(self.downloader.clone(), url).boxed());
                }
            }
            if in_flight.is_empty() {
                if !queue.is_empty() {
                    engine_debug!("Limit reached, {} links left undispatched", queue.len());
                }
                return Drain::Finished;
            }

            tokio::select! {
                _ = cancel.cancelled() => return Drain::Cancelled,
                Some((url, result)) = in_flight.next() => self.apply(url, result),
            }
        }
    }

    fn apply(&mut self, url: String, result: Result<FetchedImage, FetchError>) {
        let image = match result {
            Ok(image) => image,
            Err(err) => {
                self.state.release();
                engine_error!("Issue getting: {}\nError: {}", url, err);
                return;
            }
        };

        let sequence = self.state.next_sequence();
        if self.settings.verbose {
            engine_info!("Downloading Image #{} from {}", sequence, url);
        }
        match self.downloader.store(&image, sequence) {
            DownloadResult::Success { path, sequence } => {
                let downloaded = self.state.commit();
                if self.settings.verbose {
                    engine_info!("File Downloaded: {}", path.display());
                }
                self.reporter.report(downloaded);
                self.saved.push(SavedImage {
                    sequence,
                    url,
                    path,
                });
            }
            DownloadResult::Failure { url, reason } => {
                self.state.release();
                engine_error!("Issue saving: {}\nError: {}", url, reason);
            }
        }
    }
}

type FetchOutcome = (String, Result<FetchedImage, FetchError>);

async fn fetch_task(downloader: Downloader, url: String) -> FetchOutcome {
    let result = downloader.fetch_image(&url).await;
    (url, result)
}
