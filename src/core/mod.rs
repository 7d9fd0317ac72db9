//! Core process state shared across the codebase.

mod state;

pub use state::{CancelToken, is_shutdown, setup_shutdown_handler};
