use crate::{
    next_phase, Admission, DownloadCounter, LinkFilter, Outcome, Phase, PhaseEvent, SearchSession,
    SeenSet, TerminalReason,
};

/// Index of the next results page to request. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    page_index: u32,
}

impl PageCursor {
    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn advance(&mut self) {
        self.page_index += 1;
    }
}

/// Mutable state of one session, owned by a single controller.
#[derive(Debug, Clone)]
pub struct SessionState {
    phase: Phase,
    cursor: PageCursor,
    seen: SeenSet,
    counter: DownloadCounter,
    filter: LinkFilter,
    pages_requested: u32,
}

impl SessionState {
    pub fn new(session: &SearchSession) -> Self {
        Self {
            phase: Phase::Idle,
            cursor: PageCursor::default(),
            seen: SeenSet::new(),
            counter: DownloadCounter::new(session.limit()),
            filter: LinkFilter::new(session.badsites().to_vec()),
            pages_requested: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn counter(&self) -> &DownloadCounter {
        &self.counter
    }

    pub fn pages_requested(&self) -> u32 {
        self.pages_requested
    }

    fn apply(&mut self, event: PhaseEvent) -> Phase {
        self.phase = next_phase(self.phase, event);
        self.phase
    }

    pub fn start(&mut self) -> Phase {
        self.apply(PhaseEvent::Start)
    }

    /// Marks a page request as issued and returns its index.
    pub fn begin_request(&mut self) -> u32 {
        self.pages_requested += 1;
        self.cursor.page_index()
    }

    pub fn page_fetched(&mut self) -> Phase {
        self.apply(PhaseEvent::PageFetched)
    }

    pub fn page_failed(&mut self) -> Phase {
        self.apply(PhaseEvent::PageFailed)
    }

    pub fn links_extracted(&mut self, count: usize) -> Phase {
        self.apply(PhaseEvent::LinksExtracted { count })
    }

    /// Runs the link filter over one page and moves on to dispatching.
    ///
    /// `on_reject` is called for every dropped link, in extraction order.
    pub fn filter_links<F>(&mut self, links: Vec<String>, mut on_reject: F) -> Vec<String>
    where
        F: FnMut(&str, &Admission),
    {
        let mut admitted = Vec::with_capacity(links.len());
        for link in links {
            match self.filter.check(&link, &mut self.seen) {
                Admission::Admitted => admitted.push(link),
                rejected => on_reject(&link, &rejected),
            }
        }
        self.apply(PhaseEvent::LinksFiltered);
        admitted
    }

    pub fn try_reserve(&mut self) -> bool {
        !self.phase.is_terminal() && self.counter.try_reserve()
    }

    pub fn next_sequence(&self) -> usize {
        self.counter.next_sequence()
    }

    pub fn commit(&mut self) -> usize {
        self.counter.commit()
    }

    pub fn release(&mut self) {
        self.counter.release();
    }

    /// Called once every admitted link of the page has been handled.
    pub fn page_drained(&mut self) -> Phase {
        let limit_reached = self.counter.is_full();
        let phase = self.apply(PhaseEvent::PageDrained { limit_reached });
        if phase == Phase::Requesting {
            self.cursor.advance();
        }
        phase
    }

    pub fn cancel(&mut self) -> Phase {
        self.counter.release_all();
        self.apply(PhaseEvent::Cancel)
    }

    pub fn outcome(&self) -> Outcome {
        let reason = match self.phase {
            Phase::Aborted => TerminalReason::Aborted,
            Phase::Cancelled => TerminalReason::Cancelled,
            _ if self.counter.is_full() => TerminalReason::LimitReached,
            _ => TerminalReason::Exhausted,
        };
        Outcome {
            downloaded: self.counter.committed(),
            pages_requested: self.pages_requested,
            reason,
        }
    }
}
