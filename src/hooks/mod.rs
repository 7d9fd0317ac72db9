//! Before/after run hooks.
//!
//! `before` runs once before any file is touched and aborts the run when it
//! fails. `after` runs once after all processing and only reports failure.

mod runner;

pub use runner::{build_vars, run_hook};
