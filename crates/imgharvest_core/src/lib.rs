//! Image harvest core: pure session model, link filtering and the pipeline state machine.
mod counter;
mod filter;
mod phase;
mod request;
mod session;
mod state;
mod types;

pub use counter::DownloadCounter;
pub use filter::{Admission, LinkFilter, SeenSet};
pub use phase::{next_phase, Phase, PhaseEvent};
pub use request::{build_page_url, DEFAULT_SEARCH_BASE};
pub use session::{AdultFilter, SearchSession, SessionError, TypeFilter};
pub use state::{PageCursor, SessionState};
pub use types::{DownloadResult, FailureKind, Outcome, TerminalReason};
