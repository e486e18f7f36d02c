use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine_logging::engine_error;
use imgharvest_core::{DownloadResult, FailureKind};

use crate::filename::image_filename;
use crate::persist::AtomicFileWriter;
use crate::sniff::{extension_for_url, sniff_image};
use crate::{FetchError, Fetcher};

/// Image bytes that passed format sniffing but are not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub url: String,
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// Fetches single images and stores them as `{prefix}_{index}.{ext}`.
///
/// Cloning is cheap; clones share the fetcher.
#[derive(Clone)]
pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    writer: AtomicFileWriter,
    prefix: String,
}

impl Downloader {
    pub fn new(fetcher: Arc<dyn Fetcher>, destination_dir: PathBuf, prefix: impl Into<String>) -> Self {
        Self {
            fetcher,
            writer: AtomicFileWriter::new(destination_dir),
            prefix: prefix.into(),
        }
    }

    pub fn destination_dir(&self) -> &Path {
        self.writer.dir()
    }

    /// Fetch one URL and verify the payload really is an image.
    pub async fn fetch_image(&self, url: &str) -> Result<FetchedImage, FetchError> {
        let extension = extension_for_url(url);
        let output = self.fetcher.fetch(url).await?;
        if sniff_image(&output.bytes).is_none() {
            return Err(FetchError::new(
                FailureKind::InvalidImage,
                format!("Invalid image, not saving {url}"),
            ));
        }
        Ok(FetchedImage {
            url: url.to_string(),
            bytes: output.bytes,
            extension,
        })
    }

    /// Persist a verified image under the given sequence number.
    pub fn store(&self, image: &FetchedImage, index: usize) -> DownloadResult {
        let filename = image_filename(&self.prefix, index, &image.extension);
        match self.writer.write(&filename, &image.bytes) {
            Ok(path) => DownloadResult::Success {
                path,
                sequence: index,
            },
            Err(err) => {
                engine_error!("Failed to save {} from {}: {}", filename, image.url, err);
                DownloadResult::Failure {
                    url: image.url.clone(),
                    reason: FailureKind::Io,
                }
            }
        }
    }

    /// Fetch, verify and store in one step.
    pub async fn download(&self, url: &str, index: usize) -> DownloadResult {
        match self.fetch_image(url).await {
            Ok(image) => self.store(&image, index),
            Err(err) => DownloadResult::Failure {
                url: url.to_string(),
                reason: err.kind,
            },
        }
    }
}
