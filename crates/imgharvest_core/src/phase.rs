/// Pipeline phases of one search session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Requesting,
    Extracting,
    Filtering,
    Dispatching,
    Done,
    Aborted,
    Cancelled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Aborted | Phase::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Start,
    PageFetched,
    PageFailed,
    LinksExtracted { count: usize },
    LinksFiltered,
    PageDrained { limit_reached: bool },
    Cancel,
}

/// Pure transition function. Events that do not apply to the current phase
/// leave it unchanged; terminal phases absorb everything.
pub fn next_phase(phase: Phase, event: PhaseEvent) -> Phase {
    if phase.is_terminal() {
        return phase;
    }
    match (phase, event) {
        (_, PhaseEvent::Cancel) => Phase::Cancelled,
        (Phase::Idle, PhaseEvent::Start) => Phase::Requesting,
        (Phase::Requesting, PhaseEvent::PageFetched) => Phase::Extracting,
        (Phase::Requesting, PhaseEvent::PageFailed) => Phase::Aborted,
        (Phase::Extracting, PhaseEvent::LinksExtracted { count: 0 }) => Phase::Done,
        (Phase::Extracting, PhaseEvent::LinksExtracted { .. }) => Phase::Filtering,
        (Phase::Filtering, PhaseEvent::LinksFiltered) => Phase::Dispatching,
        (Phase::Dispatching, PhaseEvent::PageDrained { limit_reached: true }) => Phase::Done,
        (Phase::Dispatching, PhaseEvent::PageDrained { limit_reached: false }) => {
            Phase::Requesting
        }
        (phase, _) => phase,
    }
}
