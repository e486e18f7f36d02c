mod cli;
mod config;
mod progress;

use anyhow::bail;
use clap::Parser;
use engine_logging::{engine_error, engine_info, LogDestination};
use imgharvest_engine::{EngineEvent, EngineHandle, EngineSettings, JobId};

use crate::cli::Cli;
use crate::progress::ProgressBoard;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let defaults = config::load_defaults(cli.config.as_deref())?;

    let verbose = defaults.verbose && !cli.quiet;
    let destination = if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    engine_logging::initialize(destination, verbose);

    let engine = EngineHandle::new(EngineSettings {
        max_parallel_sessions: cli.jobs,
        cancel_on_ctrl_c: true,
    });
    for (index, query) in cli.queries.iter().enumerate() {
        let options = config::options_for(&cli, &defaults, query);
        engine.submit(index as JobId, options);
    }

    let mut board = ProgressBoard::new();
    let mut remaining = cli.queries.len();
    let mut failed = Vec::new();
    while remaining > 0 {
        let Some(event) = engine.recv() else {
            bail!("download engine stopped unexpectedly");
        };
        match event {
            EngineEvent::Started {
                job_id,
                query,
                limit,
            } => board.start(job_id, &query, limit),
            EngineEvent::Progress { job_id, downloaded } => board.update(job_id, downloaded),
            EngineEvent::Completed { job_id, result } => {
                remaining -= 1;
                board.finish(job_id, &result);
                let query = &cli.queries[job_id as usize];
                match result {
                    Ok(outcome) => {
                        engine_info!("'{}': {:?}", query, outcome.reason);
                        println!("{query}: downloaded {} images", outcome.downloaded);
                    }
                    Err(err) => {
                        engine_error!("'{}' failed: {}", query, err);
                        failed.push(query.clone());
                    }
                }
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} of {} queries failed: {}", failed.len(), cli.queries.len(), failed.join(", "));
    }
    Ok(())
}
