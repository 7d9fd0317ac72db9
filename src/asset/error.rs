//! Per-file processing errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::AssetKind;

/// Errors raised while processing a single asset.
///
/// In batch mode each error stays with its own unit of work; in single-file
/// mode it reaches `main` and ends the process with a non-zero status.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read `{path}`")]
    NotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write `{path}`")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{0}` is neither a recognized asset file nor a directory")]
    UnrecognizedTarget(PathBuf),

    #[error("{kind} minifier rejected `{path}`")]
    Minify { path: PathBuf, kind: AssetKind },

    #[error("output would replace input `{0}` (pass --overwrite to allow)")]
    WouldOverwrite(PathBuf),
}

impl AssetError {
    pub fn not_readable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::NotReadable {
            path: path.into(),
            source,
        }
    }

    pub fn not_writable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::NotWritable {
            path: path.into(),
            source,
        }
    }

    /// Message followed by every underlying cause, `: `-separated.
    pub fn chain(&self) -> String {
        let mut text = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}
