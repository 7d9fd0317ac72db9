//! Parallel fan-out of independent asset units.
//!
//! Every path is its own unit of work: classify, then either process once
//! or hand the path to a [`watch_file`] loop. Units share no mutable state;
//! a failing unit is reported and never aborts its siblings.

pub mod watch;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use rayon::prelude::*;

use crate::asset::{
    AssetError, AssetKind, OutputTarget, ProcessedAsset, ProcessingOptions, process_asset,
};
use crate::core::CancelToken;
use crate::utils::plural::{plural_count, plural_s};
use crate::{debug, log};

pub use watch::{DEFAULT_INTERVAL, watch_file};

/// How a batch is scheduled.
#[derive(Debug, Clone, Default)]
pub struct BatchSettings {
    /// Worker count, defaults to the host's available parallelism.
    pub jobs: Option<usize>,
    /// Watch every path with this poll interval instead of processing once.
    pub watch: Option<Duration>,
}

/// Outcome of a whole batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Units that wrote their outputs.
    pub processed: Vec<ProcessedAsset>,
    /// Units that failed, with their error.
    pub failed: Vec<(PathBuf, AssetError)>,
    /// Watch units that ended cleanly, with the number of changes handled.
    pub watched: Vec<(PathBuf, usize)>,
    /// Units never started because shutdown was requested.
    pub skipped: usize,
}

impl BatchReport {
    /// Units that completed without error.
    pub fn succeeded(&self) -> usize {
        self.processed.len() + self.watched.len()
    }
}

enum Outcome {
    Processed(ProcessedAsset),
    Watched(PathBuf, usize),
    Failed(PathBuf, AssetError),
    Skipped,
}

/// Run every path on a bounded worker pool and wait for all of them.
///
/// In watch mode the call only returns after `cancel` fires.
pub fn run_batch(
    paths: &[PathBuf],
    options: &ProcessingOptions,
    settings: &BatchSettings,
    cancel: &CancelToken,
) -> Result<BatchReport> {
    let threads = pool_size(paths.len(), settings);
    log!("batch"; "{} on {} worker{}", plural_count(paths.len(), "file"), threads, plural_s(threads));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("assetmin-worker-{i}"))
        .build()?;

    // One path per job so a blocking watch unit never holds back another path
    let outcomes: Vec<Outcome> = pool.install(|| {
        paths
            .par_iter()
            .with_max_len(1)
            .map(|path| run_unit(path, options, settings, cancel))
            .collect()
    });

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Processed(asset) => report.processed.push(asset),
            Outcome::Watched(path, changes) => report.watched.push((path, changes)),
            Outcome::Failed(path, err) => report.failed.push((path, err)),
            Outcome::Skipped => report.skipped += 1,
        }
    }
    debug!("batch"; "finished: {} ok, {} failed, {} skipped",
        report.succeeded(), report.failed.len(), report.skipped);
    Ok(report)
}

/// Worker count: requested or host parallelism, capped by the number of
/// paths in one-shot mode and raised to one per path in watch mode.
fn pool_size(paths: usize, settings: &BatchSettings) -> usize {
    let base = settings
        .jobs
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        });
    if settings.watch.is_some() {
        base.max(paths)
    } else {
        base.min(paths.max(1))
    }
}

fn run_unit(
    path: &Path,
    options: &ProcessingOptions,
    settings: &BatchSettings,
    cancel: &CancelToken,
) -> Outcome {
    if cancel.is_cancelled() {
        return Outcome::Skipped;
    }

    let Some(kind) = AssetKind::from_path(path, options.overwrite) else {
        return fail(path, AssetError::UnrecognizedTarget(path.to_path_buf()));
    };

    match settings.watch {
        Some(interval) => {
            let result = watch_file(path, interval, cancel, |changed| {
                if let Err(err) = process_asset(kind, changed, options, &OutputTarget::Derived) {
                    report_error(changed, &err);
                }
            });
            match result {
                Ok(changes) => Outcome::Watched(path.to_path_buf(), changes),
                Err(err) => fail(path, err),
            }
        }
        None => match process_asset(kind, path, options, &OutputTarget::Derived) {
            Ok(asset) => Outcome::Processed(asset),
            Err(err) => fail(path, err),
        },
    }
}

fn fail(path: &Path, err: AssetError) -> Outcome {
    report_error(path, &err);
    Outcome::Failed(path.to_path_buf(), err)
}

/// Log an error together with its source chain.
pub fn report_error(path: &Path, err: &AssetError) {
    log!("error"; "{}: {}", path.display(), err.chain());
}
