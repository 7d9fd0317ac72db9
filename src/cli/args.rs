//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Minify CSS, HTML and JS files, or every one of them under a directory.
///
/// Markup input is `*.htm` (written as `*.html`), or `*.html` itself with
/// `--overwrite`. Content hashes are the first 11 hex chars of SHA-1. Watch
/// mode polls modification times, so changes can take one interval to be
/// noticed.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// File or folder to process
    #[arg(value_name = "FULLPATH", value_hint = clap::ValueHint::AnyPath)]
    pub target: PathBuf,

    /// Wrap output to ~80 chars per line, CSS only
    #[arg(long)]
    pub wrap: bool,

    /// Prefix string to prepend on output filenames
    #[arg(long)]
    pub prefix: Option<String>,

    /// Add a time stamp comment on CSS/JS output files
    #[arg(long)]
    pub timestamp: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Add an 11-char SHA-1 hex digest to output filenames
    #[arg(long)]
    pub hash: bool,

    /// Gzip minified files as `*.gz`, CSS/JS only
    #[arg(long)]
    pub zipy: bool,

    /// Alphabetically sort CSS properties, CSS only
    #[arg(long)]
    pub sort: bool,

    /// Keep comments, CSS/HTML only
    #[arg(long)]
    pub comments: bool,

    /// Overwrite input files in place
    #[arg(long)]
    pub overwrite: bool,

    /// Shell command to execute after the run
    #[arg(long, value_name = "COMMAND")]
    pub after: Option<String>,

    /// Shell command to execute before the run
    #[arg(long, value_name = "COMMAND")]
    pub before: Option<String>,

    /// Watch files and re-minify them when they change
    #[arg(short, long)]
    pub watch: bool,

    /// Allow multiple instances to run at the same time
    #[arg(long)]
    pub multiple: bool,

    /// Exact output file (single file only); gzip-encoded with --zipy
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Seconds between two modification checks in watch mode
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Number of parallel workers for folders (default: CPU count)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: assetmin.toml, searched upward)
    #[arg(short = 'C', long, default_value = "assetmin.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,
}
