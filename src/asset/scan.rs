//! Directory scanning (pure, no writes).

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::debug;

/// Filter for [`scan_tree`].
#[derive(Debug, Clone, Default)]
pub struct ScanFilter<'a> {
    /// File name must end with one of these.
    pub include: &'a [&'a str],
    /// File name must not end with any of these.
    pub exclude: &'a [&'a str],
    /// Keep files whose name starts with `.`.
    pub include_hidden: bool,
}

impl ScanFilter<'_> {
    /// Check a file name against the filter.
    ///
    /// Suffixes are compared case-insensitively, like extension
    /// classification.
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        (self.include_hidden || !name.starts_with('.'))
            && !self.exclude.iter().any(|suffix| lower.ends_with(suffix))
            && self.include.iter().any(|suffix| lower.ends_with(suffix))
    }
}

/// Recursively collect regular files under `root` that pass `filter`.
///
/// Returns absolute paths in a stable (sorted walk) order. Only file names
/// are tested, so hidden directories are still descended into. Unreadable
/// subdirectories are skipped.
///
/// # Pure Function
///
/// This function only reads the filesystem and returns data
pub fn scan_tree(root: &Path, filter: &ScanFilter<'_>) -> Vec<PathBuf> {
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

    let files: Vec<PathBuf> = WalkDir::new(&root)
        .skip_hidden(false)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| filter.matches(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.path())
        .collect();

    debug!("scan"; "{} candidate files under {}", files.len(), root.display());
    files
}
