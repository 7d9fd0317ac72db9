//! assetmin - batch minifier for CSS, HTML and JS files.

mod asset;
mod batch;
mod cli;
mod config;
mod core;
mod hooks;
mod logger;
mod utils;

use clap::{ColorChoice, Parser};
use cli::Cli;
use config::AppConfig;

fn main() {
    // Setup global Ctrl+C handler (before any blocking operations)
    let cancel = match core::setup_shutdown_handler() {
        Ok(token) => token,
        Err(e) => {
            log!("error"; "{:#}", e);
            std::process::exit(1);
        }
    };

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);
    logger::set_quiet(cli.quiet);

    let result = AppConfig::load(&cli).and_then(|config| cli::run(&cli, &config, &cancel));
    if let Err(e) = result {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }

    if core::is_shutdown() {
        std::process::exit(130);
    }
}
