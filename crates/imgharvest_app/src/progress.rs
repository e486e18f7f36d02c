use std::collections::HashMap;

use imgharvest_core::{Outcome, TerminalReason};
use imgharvest_engine::JobId;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{prefix:>20.bold} [{bar:40.green}] {pos}/{len} images | {per_sec} | ETA {eta} {msg}";

/// One progress bar per running query.
pub struct ProgressBoard {
    multi: MultiProgress,
    style: ProgressStyle,
    bars: HashMap<JobId, ProgressBar>,
}

impl ProgressBoard {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        Self {
            multi: MultiProgress::new(),
            style,
            bars: HashMap::new(),
        }
    }

    pub fn start(&mut self, job_id: JobId, query: &str, limit: usize) {
        let bar = self.multi.add(ProgressBar::new(limit as u64));
        bar.set_style(self.style.clone());
        bar.set_prefix(query.to_string());
        self.bars.insert(job_id, bar);
    }

    pub fn update(&self, job_id: JobId, downloaded: usize) {
        if let Some(bar) = self.bars.get(&job_id) {
            bar.set_position(downloaded as u64);
        }
    }

    pub fn finish(&mut self, job_id: JobId, result: &Result<Outcome, String>) {
        let Some(bar) = self.bars.remove(&job_id) else {
            return;
        };
        match result {
            Ok(outcome) => {
                bar.set_position(outcome.downloaded as u64);
                bar.finish_with_message(describe(outcome.reason));
            }
            Err(_) => bar.abandon_with_message("failed"),
        }
    }
}

fn describe(reason: TerminalReason) -> &'static str {
    match reason {
        TerminalReason::LimitReached => "done",
        TerminalReason::Exhausted => "no more results",
        TerminalReason::Aborted => "search request failed",
        TerminalReason::Cancelled => "cancelled",
    }
}
