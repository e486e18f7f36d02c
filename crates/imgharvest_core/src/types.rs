use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidImage,
    Io,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidImage => write!(f, "invalid image"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of a single download attempt; consumed by the counter and reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Success { path: PathBuf, sequence: usize },
    Failure { url: String, reason: FailureKind },
}

impl DownloadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadResult::Success { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    LimitReached,
    /// The engine returned a page without any result markers.
    Exhausted,
    /// A page request failed.
    Aborted,
    Cancelled,
}

/// Final report of a session. Returned for every terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub downloaded: usize,
    pub pages_requested: u32,
    pub reason: TerminalReason,
}
