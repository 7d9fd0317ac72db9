//! Run driver: resolve the target, run hooks, dispatch to single-file or
//! folder processing and print the summary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::asset::{
    AssetError, AssetKind, OutputTarget, ProcessedAsset, ProcessingOptions, ScanFilter,
    process_markup, process_script, process_stylesheet, scan_tree,
};
use crate::batch::{report_error, run_batch, watch_file};
use crate::config::AppConfig;
use crate::core::CancelToken;
use crate::hooks::{build_vars, run_hook};
use crate::utils::plural::plural_count;
use crate::{debug, log};

use super::Cli;
use super::lock::InstanceLock;

/// What the positional argument turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    File(AssetKind),
    Folder,
}

/// Execute one invocation. Errors are fatal for the process.
pub fn run(cli: &Cli, config: &AppConfig, cancel: &CancelToken) -> Result<()> {
    if let Some(path) = &config.config_path {
        debug!("config"; "using {}", path.display());
    }
    let target_path = expand_path(&cli.target);
    let options = config.processing_options();
    let target = classify(&target_path, options.overwrite)?;
    debug!("run"; "{} is {:?}", target_path.display(), target);

    let output = cli.output.as_deref().map(expand_path);
    if output.is_some() && target == Target::Folder {
        bail!("--output only applies to a single file target");
    }

    let _lock = if cli.multiple {
        None
    } else {
        Some(InstanceLock::acquire()?)
    };

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let vars = build_vars(&target_path, options.overwrite, config.watch_enabled);
    if let Some(before) = &config.hooks.before {
        run_hook(before, "before", &cwd, &vars, cli.quiet).context("before hook failed")?;
    }

    let succeeded = match target {
        Target::File(kind) => {
            let target = match output {
                Some(path) => OutputTarget::exact(path, options.gzip && kind.supports_gzip()),
                None => OutputTarget::Derived,
            };
            run_single(kind, &target_path, &options, &target, config, cancel)?
        }
        Target::Folder => run_folder(&target_path, &options, config, cancel)?,
    };

    if let Some(after) = &config.hooks.after
        && let Err(e) = run_hook(after, "after", &cwd, &vars, false)
    {
        log!("error"; "after hook failed: {:#}", e);
    }

    log!("done"; "{} processed", plural_count(succeeded, "file"));
    Ok(())
}

/// `~` expansion for user-supplied paths.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).as_ref())
}

fn classify(path: &Path, overwrite: bool) -> Result<Target, AssetError> {
    if path.is_dir() {
        return Ok(Target::Folder);
    }
    if path.is_file()
        && let Some(kind) = AssetKind::from_path(path, overwrite)
    {
        return Ok(Target::File(kind));
    }
    Err(AssetError::UnrecognizedTarget(path.to_path_buf()))
}

/// Process (or watch) one file in the calling thread.
///
/// Returns the number of files processed successfully.
fn run_single(
    kind: AssetKind,
    path: &Path,
    options: &ProcessingOptions,
    target: &OutputTarget,
    config: &AppConfig,
    cancel: &CancelToken,
) -> Result<usize> {
    match config.watch_interval() {
        Some(interval) => {
            let changes = watch_file(path, interval, cancel, |changed| {
                if let Err(err) = process_one(kind, changed, options, target) {
                    report_error(changed, &err);
                }
            })?;
            debug!("watch"; "stopped after {}", plural_count(changes, "change"));
            Ok(1)
        }
        None => {
            process_one(kind, path, options, target)?;
            Ok(1)
        }
    }
}

fn process_one(
    kind: AssetKind,
    path: &Path,
    options: &ProcessingOptions,
    target: &OutputTarget,
) -> Result<ProcessedAsset, AssetError> {
    match kind {
        AssetKind::Stylesheet => process_stylesheet(path, options, target),
        AssetKind::Markup => process_markup(path, options, target),
        AssetKind::Script => process_script(path, options, target),
    }
}

/// Scan a folder and fan its files out over the worker pool.
///
/// Per-file failures are reported by the batch and do not fail the run.
fn run_folder(
    root: &Path,
    options: &ProcessingOptions,
    config: &AppConfig,
    cancel: &CancelToken,
) -> Result<usize> {
    let include = AssetKind::include_suffixes(options.overwrite);
    let exclude = AssetKind::exclude_suffixes(options.overwrite);
    let filter = ScanFilter {
        include: &include,
        exclude: &exclude,
        include_hidden: false,
    };

    let paths = scan_tree(root, &filter);
    if paths.is_empty() {
        log!("scan"; "no css, js or markup files under {}", root.display());
        return Ok(0);
    }

    let report = run_batch(&paths, options, &config.batch_settings(), cancel)?;
    for asset in &report.processed {
        let gzip = asset
            .gzip
            .as_ref()
            .map(|g| format!(" + {}", g.display()))
            .unwrap_or_default();
        debug!("batch"; "{}: {} -> {}{}", asset.kind, asset.input.display(), asset.output.display(), gzip);
    }
    if !report.failed.is_empty() {
        log!("warning"; "{} failed", plural_count(report.failed.len(), "file"));
    }
    if report.skipped > 0 {
        log!("warning"; "{} skipped after shutdown", plural_count(report.skipped, "file"));
    }
    Ok(report.succeeded())
}
