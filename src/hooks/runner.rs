//! Hook execution utilities.
//!
//! Provides environment variable building and command execution for the
//! `before` / `after` hooks.

use std::path::Path;

use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::log;
use crate::utils::exec::{combined_output, run_shell};

// ============================================================================
// Environment Variables
// ============================================================================

/// Build `$ASSETMIN_*` environment variables for hook execution
pub fn build_vars(target: &Path, overwrite: bool, watch: bool) -> FxHashMap<String, String> {
    let mut vars = FxHashMap::default();
    vars.insert("ASSETMIN_TARGET".into(), target.display().to_string());
    vars.insert("ASSETMIN_OVERWRITE".into(), overwrite.to_string());
    vars.insert("ASSETMIN_WATCH".into(), watch.to_string());
    vars
}

// ============================================================================
// Hook Execution
// ============================================================================

/// Execute a single hook command line through the shell.
///
/// The `phase` parameter is used for logging (e.g., "before" or "after").
/// Output is printed without prefix unless `quiet`.
pub fn run_hook(
    command: &str,
    phase: &str,
    cwd: &Path,
    vars: &FxHashMap<String, String>,
    quiet: bool,
) -> Result<()> {
    if command.trim().is_empty() {
        return Ok(());
    }

    log!(phase; "`{}` running", command);
    let output = run_shell(command, cwd, vars)?;

    if !quiet {
        let text = combined_output(&output);
        let text = text.trim();
        if !text.is_empty() {
            println!("{text}");
        }
    }
    Ok(())
}
