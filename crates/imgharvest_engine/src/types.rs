use std::path::PathBuf;

use imgharvest_core::{FailureKind, Outcome};

pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Started {
        job_id: JobId,
        query: String,
        limit: usize,
    },
    Progress {
        job_id: JobId,
        downloaded: usize,
    },
    Completed {
        job_id: JobId,
        result: Result<Outcome, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// One image written during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub sequence: usize,
    pub url: String,
    pub path: PathBuf,
}

/// What a finished session hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    pub outcome: Outcome,
    pub image_dir: PathBuf,
    pub images: Vec<SavedImage>,
}
