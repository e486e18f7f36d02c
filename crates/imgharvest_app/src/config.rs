use std::fs;
use std::path::Path;

use anyhow::Context;
use engine_logging::engine_info;
use imgharvest_engine::DownloadOptions;

use crate::cli::Cli;

/// Defaults for every query: built-in values, overlaid by the RON file if given.
pub fn load_defaults(path: Option<&Path>) -> anyhow::Result<DownloadOptions> {
    let Some(path) = path else {
        return Ok(DownloadOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let options = parse_defaults(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    engine_info!("Loaded defaults from {}", path.display());
    Ok(options)
}

pub fn parse_defaults(text: &str) -> Result<DownloadOptions, ron::error::SpannedError> {
    ron::from_str(text)
}

/// Options for one query: command-line values win over the defaults.
pub fn options_for(cli: &Cli, defaults: &DownloadOptions, query: &str) -> DownloadOptions {
    let mut options = defaults.clone();
    options.query = query.to_string();
    if let Some(limit) = cli.limit {
        options.limit = limit;
    }
    if let Some(dir) = &cli.output_dir {
        options.output_dir = dir.clone();
    }
    if cli.adult_filter_on {
        options.adult_filter_off = false;
    }
    if cli.force_replace {
        options.force_replace = true;
    }
    if let Some(timeout) = cli.timeout {
        options.timeout_secs = timeout;
    }
    if let Some(filter) = &cli.filter {
        options.filter = filter.clone();
    }
    if cli.quiet {
        options.verbose = false;
    }
    options.badsites.extend(cli.badsites.iter().cloned());
    if let Some(name) = &cli.name {
        options.name = name.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        options.concurrency = concurrency;
    }
    if cli.manifest {
        options.manifest = true;
    }
    if let Some(base) = &cli.search_base {
        options.search_base = base.clone();
    }
    options
}
