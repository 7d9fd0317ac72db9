//! Single-asset processing with side effects (read, minify, write).
//!
//! One entry point per asset kind; all three share [`process_asset`].
//!
//! ```text
//! read ─▶ minify ─▶ [timestamp banner] ─▶ derive path(s) ─▶ write [+ gzip twin]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::log;

use super::derive::derive;
use super::minify::minify;
use super::write::{gzip_bytes, write_atomic};
use super::{AssetError, AssetKind, Encoding, OutputTarget, ProcessingOptions};

/// Files written for one processed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedAsset {
    pub input: PathBuf,
    pub kind: AssetKind,
    /// Minified output (or the exact target path).
    pub output: PathBuf,
    /// Gzip twin, when one was written beside `output`.
    pub gzip: Option<PathBuf>,
}

/// Minify a stylesheet (`.css`).
pub fn process_stylesheet(
    input: &Path,
    options: &ProcessingOptions,
    target: &OutputTarget,
) -> Result<ProcessedAsset, AssetError> {
    process_asset(AssetKind::Stylesheet, input, options, target)
}

/// Minify a markup file (`.htm` → `.html`, or `.html` in place).
pub fn process_markup(
    input: &Path,
    options: &ProcessingOptions,
    target: &OutputTarget,
) -> Result<ProcessedAsset, AssetError> {
    process_asset(AssetKind::Markup, input, options, target)
}

/// Minify a script (`.js`).
pub fn process_script(
    input: &Path,
    options: &ProcessingOptions,
    target: &OutputTarget,
) -> Result<ProcessedAsset, AssetError> {
    process_asset(AssetKind::Script, input, options, target)
}

/// Read, minify and write one asset of the given kind.
pub fn process_asset(
    kind: AssetKind,
    input: &Path,
    options: &ProcessingOptions,
    target: &OutputTarget,
) -> Result<ProcessedAsset, AssetError> {
    let module = kind.name();

    log!(module; "reading {}", input.display());
    let source = fs::read_to_string(input).map_err(|e| AssetError::not_readable(input, e))?;

    let mut minified = minify(kind, &source, options).ok_or_else(|| AssetError::Minify {
        path: input.to_path_buf(),
        kind,
    })?;

    if options.timestamp && kind.supports_timestamp() {
        minified = format!("{}{}", timestamp_banner(), minified);
    }

    match target {
        OutputTarget::Exact { path, encoding } => {
            // Markup has no gzip form
            let encoding = if kind.supports_gzip() {
                *encoding
            } else {
                Encoding::Plain
            };
            match encoding {
                Encoding::Plain => {
                    write_atomic(path, minified.as_bytes(), input)?;
                    log!(module; "wrote {}", path.display());
                }
                Encoding::Gzip => {
                    write_gzip(path, &minified, input)?;
                    log!(module; "wrote gzip {}", path.display());
                }
            }
            Ok(ProcessedAsset {
                input: input.to_path_buf(),
                kind,
                output: path.clone(),
                gzip: None,
            })
        }
        OutputTarget::Derived => {
            let overwrite = options.overwrite;
            let old = kind.source_suffix(overwrite);
            let output = derive(
                input,
                old,
                kind.minified_suffix(overwrite),
                Some(&source),
                &options.prefix,
                options.add_hash,
            );
            if !overwrite && output == input {
                return Err(AssetError::WouldOverwrite(input.to_path_buf()));
            }

            write_atomic(&output, minified.as_bytes(), input)?;
            log!(module; "wrote {}", output.display());

            let gzip = match kind.gzip_suffix(overwrite) {
                Some(gz_suffix) if options.gzip => {
                    let gz_path = derive(
                        input,
                        old,
                        gz_suffix,
                        Some(&source),
                        &options.prefix,
                        options.add_hash,
                    );
                    write_gzip(&gz_path, &minified, input)?;
                    log!(module; "wrote gzip {}", gz_path.display());
                    Some(gz_path)
                }
                _ => None,
            };

            Ok(ProcessedAsset {
                input: input.to_path_buf(),
                kind,
                output,
                gzip,
            })
        }
    }
}

fn write_gzip(path: &Path, text: &str, template: &Path) -> Result<(), AssetError> {
    let bytes = gzip_bytes(text).map_err(|e| AssetError::not_writable(path, e))?;
    write_atomic(path, &bytes, template)
}

/// `/* 2024-06-15T14:30:45 */ ` in local time, truncated to seconds.
fn timestamp_banner() -> String {
    format!("/* {} */ ", Local::now().format("%Y-%m-%dT%H:%M:%S"))
}
