//! Command-line interface module.

mod args;
mod lock;
mod run;

pub use args::Cli;
pub use run::run;
