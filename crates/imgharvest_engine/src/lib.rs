//! Image harvest engine: search page fetching, link extraction, downloads and persistence.
mod controller;
mod download;
mod engine;
mod extract;
mod fetch;
mod filename;
mod harvest;
mod manifest;
mod options;
mod page;
mod persist;
mod progress;
mod sniff;
mod types;

pub use controller::{ControllerSettings, PaginationController};
pub use download::{Downloader, FetchedImage};
pub use engine::{EngineHandle, EngineSettings};
pub use extract::{LinkExtractor, MarkerLinkExtractor};
pub use fetch::{browser_headers, FetchSettings, Fetcher, ReqwestFetcher, BROWSER_USER_AGENT};
pub use filename::{image_filename, sanitize_component};
pub use harvest::{run_harvest, run_harvest_with, HarvestError};
pub use manifest::{write_manifest, MANIFEST_FILENAME};
pub use options::DownloadOptions;
pub use page::decode_page;
pub use persist::{ensure_output_dir, prepare_query_dir, AtomicFileWriter, PersistError};
pub use progress::{ChannelProgressSink, NoopSink, ProgressReporter, ProgressSink};
pub use sniff::{extension_for_url, sniff_image, DEFAULT_EXTENSION, KNOWN_EXTENSIONS};
pub use types::{
    EngineEvent, FetchError, FetchMetadata, FetchOutput, HarvestReport, JobId, SavedImage,
};
