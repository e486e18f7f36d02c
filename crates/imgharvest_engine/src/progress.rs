use std::sync::{mpsc, Arc};

use crate::{EngineEvent, JobId};

/// Receives the running count of successfully saved images.
pub trait ProgressSink: Send + Sync {
    fn report(&self, downloaded: usize);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn report(&self, _downloaded: usize) {}
}

/// Forwards counts as [`EngineEvent::Progress`] for one job.
pub struct ChannelProgressSink {
    job_id: JobId,
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(job_id: JobId, tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { job_id, tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn report(&self, downloaded: usize) {
        let _ = self.tx.send(EngineEvent::Progress {
            job_id: self.job_id,
            downloaded,
        });
    }
}

/// Guards the sink: values only ever increase, and a missing sink is a no-op.
pub struct ProgressReporter {
    sink: Option<Arc<dyn ProgressSink>>,
    last: usize,
}

impl ProgressReporter {
    pub fn new(sink: Option<Arc<dyn ProgressSink>>) -> Self {
        Self { sink, last: 0 }
    }

    pub fn report(&mut self, downloaded: usize) {
        if downloaded <= self.last {
            return;
        }
        self.last = downloaded;
        if let Some(sink) = &self.sink {
            sink.report(downloaded);
        }
    }

    pub fn last_reported(&self) -> usize {
        self.last
    }
}
