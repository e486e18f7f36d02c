use std::path::PathBuf;
use std::time::Duration;

use imgharvest_core::{
    AdultFilter, SearchSession, SessionError, TypeFilter, DEFAULT_SEARCH_BASE,
};
use serde::{Deserialize, Serialize};

/// Invocation parameters of one download session.
///
/// Every field has a default so a config file may set any subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadOptions {
    pub query: String,
    pub limit: usize,
    pub output_dir: PathBuf,
    pub adult_filter_off: bool,
    pub force_replace: bool,
    pub timeout_secs: u64,
    /// One of `line`, `photo`, `clipart`, `gif`, `transparent`, or empty.
    pub filter: String,
    pub verbose: bool,
    pub badsites: Vec<String>,
    /// Image filename prefix.
    pub name: String,
    /// Concurrent image downloads within a session.
    pub concurrency: usize,
    pub search_base: String,
    /// Write `manifest.json` next to the images.
    pub manifest: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            limit: 100,
            output_dir: PathBuf::from("dataset"),
            adult_filter_off: true,
            force_replace: false,
            timeout_secs: 60,
            filter: String::new(),
            verbose: true,
            badsites: Vec::new(),
            name: "Image".to_string(),
            concurrency: 4,
            search_base: DEFAULT_SEARCH_BASE.to_string(),
            manifest: false,
        }
    }
}

impl DownloadOptions {
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn to_session(&self) -> Result<SearchSession, SessionError> {
        Ok(SearchSession::new(self.query.clone(), self.limit)?
            .with_adult(AdultFilter::from_filter_off(self.adult_filter_off))
            .with_type_filter(TypeFilter::from_shorthand(&self.filter))
            .with_badsites(self.badsites.iter().cloned())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_image_prefix(self.name.clone()))
    }
}
