#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex, Once};

use imgharvest_engine::{DownloadOptions, ProgressSink};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Smallest byte prefix recognised as PNG.
pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
];

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// A results page embedding each URL the way the search engine does.
pub fn results_page(urls: &[String]) -> String {
    let mut body = String::from("<div class=\"dgControl\">");
    for url in urls {
        body.push_str(&format!(
            "<a class=\"iusc\" m=\"{{&quot;cid&quot;:&quot;x&quot;,&quot;murl&quot;:&quot;{url}&quot;,&quot;turl&quot;:&quot;https://tse.example/th&quot;}}\"></a>"
        ));
    }
    body.push_str("</div>");
    body
}

pub async fn mount_page(server: &MockServer, first: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/images/async"))
        .and(query_param("first", first.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

pub async fn mount_png(server: &MockServer, image_path: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_BYTES.to_vec(), "image/png"))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn image_urls(server: &MockServer, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .map(|name| format!("{}/img/{name}", server.uri()))
        .collect()
}

pub fn options(server: &MockServer, output_dir: &Path, query: &str, limit: usize) -> DownloadOptions {
    DownloadOptions {
        query: query.to_string(),
        limit,
        output_dir: output_dir.to_path_buf(),
        timeout_secs: 5,
        search_base: server.uri(),
        ..DownloadOptions::default()
    }
}

pub fn sorted_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[derive(Default)]
pub struct RecordingSink {
    counts: Arc<Mutex<Vec<usize>>>,
}

impl RecordingSink {
    pub fn counts(&self) -> Vec<usize> {
        self.counts.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, downloaded: usize) {
        self.counts.lock().unwrap().push(downloaded);
    }
}
