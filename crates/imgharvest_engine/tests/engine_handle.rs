mod common;

use std::collections::HashMap;

use common::*;
use imgharvest_core::TerminalReason;
use imgharvest_engine::{EngineEvent, EngineHandle, EngineSettings};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn batch_of_queries_reports_each_session() {
    init_logging();
    let server = MockServer::start().await;
    for query in ["cats", "dogs"] {
        let urls: Vec<String> = (1..=2)
            .map(|i| format!("{}/img/{query}{i}.png", server.uri()))
            .collect();
        Mock::given(method("GET"))
            .and(path("/images/async"))
            .and(query_param("q", query))
            .and(query_param("first", "0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(results_page(&urls), "text/html"),
            )
            .mount(&server)
            .await;
        for i in 1..=2 {
            mount_png(&server, &format!("/img/{query}{i}.png"), 1).await;
        }
    }

    let temp = TempDir::new().unwrap();
    let engine = EngineHandle::new(EngineSettings {
        max_parallel_sessions: 2,
        cancel_on_ctrl_c: false,
    });
    engine.submit(0, options(&server, temp.path(), "cats", 2));
    engine.submit(1, options(&server, temp.path(), "dogs", 2));

    let events = tokio::task::spawn_blocking(move || {
        let mut events = Vec::new();
        let mut completed = 0;
        while completed < 2 {
            let event = engine.recv().expect("engine alive");
            if matches!(event, EngineEvent::Completed { .. }) {
                completed += 1;
            }
            events.push(event);
        }
        events
    })
    .await
    .unwrap();

    let mut progress: HashMap<u64, Vec<usize>> = HashMap::new();
    let mut started = 0;
    for event in events {
        match event {
            EngineEvent::Started { limit, .. } => {
                assert_eq!(limit, 2);
                started += 1;
            }
            EngineEvent::Progress { job_id, downloaded } => {
                progress.entry(job_id).or_default().push(downloaded);
            }
            EngineEvent::Completed { result, .. } => {
                let outcome = result.expect("session ok");
                assert_eq!(outcome.downloaded, 2);
                assert_eq!(outcome.reason, TerminalReason::LimitReached);
            }
        }
    }
    assert_eq!(started, 2);
    assert_eq!(progress.get(&0), Some(&vec![1, 2]));
    assert_eq!(progress.get(&1), Some(&vec![1, 2]));
    assert_eq!(sorted_file_names(&temp.path().join("cats")).len(), 2);
    assert_eq!(sorted_file_names(&temp.path().join("dogs")).len(), 2);
}

#[test]
fn invalid_session_is_reported_as_failed_completion() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let engine = EngineHandle::new(EngineSettings::default());
    let mut opts = imgharvest_engine::DownloadOptions::for_query("cats");
    opts.limit = 0;
    opts.output_dir = temp.path().to_path_buf();
    engine.submit(3, opts);

    loop {
        match engine.recv().expect("engine alive") {
            EngineEvent::Completed { job_id, result } => {
                assert_eq!(job_id, 3);
                assert!(result.unwrap_err().contains("limit"));
                break;
            }
            EngineEvent::Started { .. } | EngineEvent::Progress { .. } => {}
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_skips_queued_queries_and_keeps_their_folders() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/async"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(10))
                .set_body_raw(results_page(&[]), "text/html"),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dogs_dir = temp.path().join("dogs");
    std::fs::create_dir_all(&dogs_dir).unwrap();
    std::fs::write(dogs_dir.join("Image_1.jpg"), b"earlier run").unwrap();

    let engine = EngineHandle::new(EngineSettings {
        max_parallel_sessions: 1,
        cancel_on_ctrl_c: false,
    });
    let mut cats = options(&server, temp.path(), "cats", 2);
    cats.timeout_secs = 30;
    let mut dogs = options(&server, temp.path(), "dogs", 2);
    dogs.force_replace = true;
    engine.submit(0, cats);
    engine.submit(1, dogs);

    let outcomes = tokio::task::spawn_blocking(move || {
        let mut outcomes = HashMap::new();
        while outcomes.len() < 2 {
            match engine.recv().expect("engine alive") {
                EngineEvent::Started { job_id: 0, .. } => engine.cancel(),
                EngineEvent::Completed { job_id, result } => {
                    outcomes.insert(job_id, result.expect("session ok"));
                }
                _ => {}
            }
        }
        outcomes
    })
    .await
    .unwrap();

    for job_id in [0, 1] {
        assert_eq!(outcomes[&job_id].reason, TerminalReason::Cancelled);
        assert_eq!(outcomes[&job_id].downloaded, 0);
    }
    assert_eq!(outcomes[&1].pages_requested, 0);
    assert_eq!(sorted_file_names(&dogs_dir), vec!["Image_1.jpg"]);
}
