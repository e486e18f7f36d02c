mod common;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use common::{init_logging, results_page, PNG_BYTES};
use imgharvest_core::{
    build_page_url, DownloadResult, FailureKind, Phase, SearchSession, TerminalReason,
};
use imgharvest_engine::{
    ControllerSettings, Downloader, FetchError, FetchMetadata, FetchOutput, Fetcher,
    LinkExtractor, MarkerLinkExtractor, PaginationController,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const BASE: &str = "https://search.test";

/// In-memory fetcher that records every URL it is asked for.
#[derive(Default)]
struct StubFetcher {
    responses: HashMap<String, Result<Vec<u8>, FailureKind>>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn respond(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.into(), Ok(body.into()));
        self
    }

    fn fail(mut self, url: impl Into<String>, kind: FailureKind) -> Self {
        self.responses.insert(url.into(), Err(kind));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Ok(bytes)) => Ok(FetchOutput {
                bytes: bytes.clone(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    content_type: None,
                    byte_len: bytes.len() as u64,
                },
            }),
            Some(Err(kind)) => Err(FetchError {
                kind: kind.clone(),
                message: "stubbed failure".to_string(),
            }),
            None => Err(FetchError {
                kind: FailureKind::HttpStatus(404),
                message: "not stubbed".to_string(),
            }),
        }
    }
}

fn page_url(session: &SearchSession, page: u32) -> String {
    build_page_url(BASE, session, page)
}

fn controller(
    session: SearchSession,
    fetcher: Arc<StubFetcher>,
    dir: PathBuf,
    concurrency: usize,
) -> PaginationController {
    let session = Arc::new(session);
    let fetcher: Arc<dyn Fetcher> = fetcher;
    let downloader = Downloader::new(fetcher.clone(), dir, session.image_prefix());
    let settings = ControllerSettings {
        search_base: BASE.to_string(),
        concurrency,
        verbose: true,
    };
    PaginationController::new(session, settings, fetcher, downloader, None)
}

fn img(name: &str) -> String {
    format!("https://cdn.test/{name}")
}

#[test]
fn extraction_is_ordered_and_idempotent() {
    let urls = vec![img("b.png"), img("a.png"), img("b.png")];
    let body = results_page(&urls);
    let extractor = MarkerLinkExtractor;

    let first = extractor.extract(&body);
    assert_eq!(first, urls);
    assert_eq!(extractor.extract(&body), first);
}

#[test]
fn page_without_markers_yields_nothing() {
    let extractor = MarkerLinkExtractor;
    assert!(extractor.extract("").is_empty());
    assert!(extractor
        .extract("<html><img src=\"https://cdn.test/a.png\"></html>")
        .is_empty());
}

#[tokio::test]
async fn downloader_writes_verified_images_only() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let fetcher = Arc::new(
        StubFetcher::default()
            .respond(img("cat.PNG"), PNG_BYTES)
            .respond(img("page.jpg"), "<html/>")
            .fail(img("gone.jpg"), FailureKind::HttpStatus(410)),
    );
    let downloader = Downloader::new(fetcher.clone(), temp.path().to_path_buf(), "Cat");

    let ok = downloader.download(&img("cat.PNG"), 1).await;
    assert_eq!(
        ok,
        DownloadResult::Success {
            path: temp.path().join("Cat_1.png"),
            sequence: 1
        }
    );

    let invalid = downloader.download(&img("page.jpg"), 2).await;
    assert_eq!(
        invalid,
        DownloadResult::Failure {
            url: img("page.jpg"),
            reason: FailureKind::InvalidImage
        }
    );
    assert!(!temp.path().join("Cat_2.jpg").exists());

    let gone = downloader.download(&img("gone.jpg"), 2).await;
    assert!(!gone.is_success());
}

#[tokio::test]
async fn repeated_urls_across_pages_are_fetched_once() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let session = SearchSession::new("cats", 10).unwrap();
    let fetcher = Arc::new(
        StubFetcher::default()
            .respond(
                page_url(&session, 0),
                results_page(&[img("a.png"), img("b.png"), img("a.png")]),
            )
            .respond(
                page_url(&session, 1),
                results_page(&[img("b.png"), img("c.png")]),
            )
            .respond(page_url(&session, 2), "")
            .respond(img("a.png"), PNG_BYTES)
            .respond(img("b.png"), PNG_BYTES)
            .respond(img("c.png"), PNG_BYTES),
    );

    let report = controller(session, fetcher.clone(), temp.path().to_path_buf(), 1)
        .run(&CancellationToken::new())
        .await;

    assert_eq!(report.outcome.downloaded, 3);
    assert_eq!(report.outcome.reason, TerminalReason::Exhausted);
    let image_calls: Vec<String> = fetcher
        .calls()
        .into_iter()
        .filter(|url| url.starts_with("https://cdn.test/"))
        .collect();
    assert_eq!(image_calls, vec![img("a.png"), img("b.png"), img("c.png")]);
}

#[tokio::test]
async fn badsite_link_triggers_no_fetch() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let session = SearchSession::new("cats", 5)
        .unwrap()
        .with_badsites(["spammy.cdn"]);
    let spam = "https://spammy.cdn/cat.png".to_string();
    let fetcher = Arc::new(
        StubFetcher::default()
            .respond(page_url(&session, 0), results_page(&[spam.clone(), img("ok.png")]))
            .respond(page_url(&session, 1), "")
            .respond(spam.clone(), PNG_BYTES)
            .respond(img("ok.png"), PNG_BYTES),
    );

    let report = controller(session, fetcher.clone(), temp.path().to_path_buf(), 4)
        .run(&CancellationToken::new())
        .await;

    assert_eq!(report.outcome.downloaded, 1);
    assert!(!fetcher.calls().contains(&spam));
}

#[tokio::test]
async fn final_count_never_exceeds_limit_across_concurrency_levels() {
    init_logging();
    for concurrency in [1, 2, 3, 16] {
        let temp = TempDir::new().unwrap();
        let session = SearchSession::new("cats", 4).unwrap();
        let names: Vec<String> = (0..10).map(|i| img(&format!("{i}.gif"))).collect();
        let mut stub = StubFetcher::default().respond(page_url(&session, 0), results_page(&names));
        for (i, name) in names.iter().enumerate() {
            if i % 3 == 0 {
                stub = stub.fail(name.clone(), FailureKind::Timeout);
            } else {
                stub = stub.respond(name.clone(), PNG_BYTES);
            }
        }
        let fetcher = Arc::new(stub);

        let report = controller(session, fetcher.clone(), temp.path().to_path_buf(), concurrency)
            .run(&CancellationToken::new())
            .await;

        assert_eq!(report.outcome.downloaded, 4, "concurrency {concurrency}");
        assert_eq!(report.outcome.reason, TerminalReason::LimitReached);
        let mut sequences: Vec<usize> = report.images.iter().map(|i| i.sequence).collect();
        sequences.sort();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        for image in &report.images {
            assert!(image.path.ends_with(format!("Image_{}.gif", image.sequence)));
        }
    }
}

#[tokio::test]
async fn transport_error_on_page_aborts() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let session = SearchSession::new("cats", 5).unwrap();
    let fetcher = Arc::new(StubFetcher::default().fail(page_url(&session, 0), FailureKind::Network));

    let controller = controller(session, fetcher.clone(), temp.path().to_path_buf(), 2);
    assert_eq!(controller.state().phase(), Phase::Idle);
    let report = controller.run(&CancellationToken::new()).await;

    assert_eq!(report.outcome.reason, TerminalReason::Aborted);
    assert_eq!(report.outcome.downloaded, 0);
    assert_eq!(fetcher.calls().len(), 1);
}
