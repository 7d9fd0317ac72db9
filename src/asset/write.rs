//! Output writers: staged atomic writes and gzip encoding.

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::NamedTempFile;

use super::AssetError;

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The temporary file takes the permissions of `template` (the input file)
/// before being renamed over `path`, so a crash never leaves a half-written
/// artifact behind.
pub fn write_atomic(path: &Path, bytes: &[u8], template: &Path) -> Result<(), AssetError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut staged =
        NamedTempFile::new_in(dir).map_err(|e| AssetError::not_writable(path, e))?;
    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| AssetError::not_writable(path, e))?;

    if let Ok(meta) = fs::metadata(template) {
        // Best effort: keep the input's mode instead of the 0600 temp default
        let _ = fs::set_permissions(staged.path(), meta.permissions());
    }

    staged
        .persist(path)
        .map_err(|e| AssetError::not_writable(path, e.error))?;
    Ok(())
}

/// Gzip-compress UTF-8 text.
pub fn gzip_bytes(text: &str) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(text.len() / 2), Compression::best());
    encoder.write_all(text.as_bytes())?;
    encoder.finish()
}
