//! Output path derivation (pure, no I/O).
//!
//! Only the extension is rewritten. Directory components and the file stem
//! are never pattern-matched, so `/data/folder.css/app.css` becomes
//! `/data/folder.css/app.min.css` and not `/data/folder.min.css/app.min.css`.
//!
//! ```text
//! /site/css/app.css  ──(".css" → ".min.css", prefix "v2-", hash)──▶  /site/css/v2-app-1b2c3d4e5f6.min.css
//! ```

use std::path::{Path, PathBuf};

use crate::debug;
use crate::utils::hash;

/// Compute the output path for `path`.
///
/// - the lowercased extension equal to `old` is replaced by `new`, any other
///   extension is kept as is
/// - a non-empty `prefix` goes in front of the file stem
/// - with `add_hash` and non-empty `content`, `-<11 hex sha1>` is appended
///   to the stem
pub fn derive(
    path: &Path,
    old: &str,
    new: &str,
    content: Option<&str>,
    prefix: &str,
    add_hash: bool,
) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    let ext = if ext == old { new.to_string() } else { ext };

    let mut name = String::with_capacity(prefix.len() + stem.len() + 12 + ext.len());
    name.push_str(prefix);
    name.push_str(&stem);

    if add_hash
        && let Some(content) = content.filter(|c| !c.is_empty())
    {
        name.push('-');
        name.push_str(&hash::fingerprint(content));
        debug!("derive"; "appended content hash to {}", path.display());
    }

    name.push_str(&ext);
    let output = dir.join(name);
    debug!("derive"; "{} -> {}", path.display(), output.display());
    output
}
