use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_error, engine_info, engine_warn};
use imgharvest_core::{Outcome, TerminalReason};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::harvest::run_harvest;
use crate::progress::{ChannelProgressSink, ProgressSink};
use crate::{DownloadOptions, EngineEvent, JobId};

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Sessions allowed to run at the same time.
    pub max_parallel_sessions: usize,
    /// Cancel every session when the process receives Ctrl-C.
    pub cancel_on_ctrl_c: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_parallel_sessions: 1,
            cancel_on_ctrl_c: false,
        }
    }
}

enum EngineCommand {
    Submit {
        job_id: JobId,
        options: Box<DownloadOptions>,
    },
}

/// Runs download sessions on a background tokio runtime.
///
/// Commands go in through [`EngineHandle::submit`], events come back through
/// [`EngineHandle::recv`]. Dropping the handle stops the runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start tokio runtime: {}", err);
                    return;
                }
            };
            if settings.cancel_on_ctrl_c {
                let token = worker_cancel.clone();
                runtime.spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        engine_warn!("Interrupted, finishing up");
                        token.cancel();
                    }
                });
            }
            let permits = Arc::new(Semaphore::new(settings.max_parallel_sessions.max(1)));
            while let Ok(command) = cmd_rx.recv() {
                let event_tx = event_tx.clone();
                let permits = permits.clone();
                let cancel = worker_cancel.clone();
                runtime.spawn(async move {
                    handle_command(command, event_tx, permits, cancel).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx,
            cancel,
        }
    }

    pub fn submit(&self, job_id: JobId, options: DownloadOptions) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            job_id,
            options: Box::new(options),
        });
    }

    /// Blocks until the next event. `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    /// Stop dispatching in every running session; each still reports its count.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

async fn handle_command(
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
) {
    match command {
        EngineCommand::Submit { job_id, options } => {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return,
            };
            if cancel.is_cancelled() {
                engine_info!("Skipping queued query '{}'", options.query);
                let _ = event_tx.send(EngineEvent::Completed {
                    job_id,
                    result: Ok(Outcome {
                        downloaded: 0,
                        pages_requested: 0,
                        reason: TerminalReason::Cancelled,
                    }),
                });
                return;
            }
            let _ = event_tx.send(EngineEvent::Started {
                job_id,
                query: options.query.clone(),
                limit: options.limit,
            });
            let sink: Arc<dyn ProgressSink> =
                Arc::new(ChannelProgressSink::new(job_id, event_tx.clone()));
            let result = run_harvest(&options, Some(sink), &cancel)
                .await
                .map(|report| report.outcome)
                .map_err(|err| err.to_string());
            let _ = event_tx.send(EngineEvent::Completed { job_id, result });
        }
    }
}
