use std::path::PathBuf;

use clap::Parser;

/// Download images for one or more search queries.
#[derive(Debug, Clone, Parser)]
#[command(name = "imgharvest", version, about)]
pub struct Cli {
    /// Search queries; each one gets its own folder under the output directory.
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Number of images to download per query.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Root directory for downloaded images.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Ask the search engine to filter adult content.
    #[arg(long)]
    pub adult_filter_on: bool,

    /// Delete an existing folder for the query before downloading.
    #[arg(short, long)]
    pub force_replace: bool,

    /// Per-request timeout in seconds.
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Restrict results to one image type.
    #[arg(long, value_parser = [
        "line", "linedrawing", "photo", "clipart", "gif", "animatedgif", "transparent",
    ])]
    pub filter: Option<String>,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Skip image URLs containing this text. Repeatable.
    #[arg(long = "badsite", value_name = "TEXT")]
    pub badsites: Vec<String>,

    /// Filename prefix for saved images.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Concurrent image downloads per query.
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Queries processed at the same time.
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Write manifest.json with the source URL of every saved image.
    #[arg(long)]
    pub manifest: bool,

    /// RON file with default options.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write logs to ./imgharvest.log.
    #[arg(long)]
    pub log_file: bool,

    #[arg(long, hide = true)]
    pub search_base: Option<String>,
}
