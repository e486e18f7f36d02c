use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;

use crate::persist::{ensure_output_dir, AtomicFileWriter, PersistError};
use crate::HarvestReport;

pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    sequence: usize,
    filename: String,
    url: &'a str,
}

/// Write `manifest.json` listing every saved image and its source URL.
pub fn write_manifest(query: &str, report: &HarvestReport) -> Result<PathBuf, PersistError> {
    let files: Vec<ManifestEntry<'_>> = report
        .images
        .iter()
        .map(|image| ManifestEntry {
            sequence: image.sequence,
            filename: image
                .path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            url: &image.url,
        })
        .collect();

    let manifest = json!({
        "query": query,
        "downloaded": report.outcome.downloaded,
        "pages_requested": report.outcome.pages_requested,
        "files": files,
    });

    ensure_output_dir(&report.image_dir)?;
    let writer = AtomicFileWriter::new(report.image_dir.clone());
    writer.write(MANIFEST_FILENAME, manifest.to_string())
}
