//! Per-run processing options and output targets.

use std::path::PathBuf;

/// Options carried unchanged through every processor call of a run.
///
/// Each asset kind honors a subset: `wrap` and `sort` are stylesheet-only,
/// `timestamp` and `gzip` apply to stylesheets and scripts, `keep_comments`
/// to stylesheets and markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingOptions {
    /// Wrap stylesheet output to ~80 chars per line.
    pub wrap: bool,
    /// Prepend a `/* <iso timestamp> */` banner.
    pub timestamp: bool,
    /// Keep comments (stylesheet banner, markup comments).
    pub keep_comments: bool,
    /// Sort declarations alphabetically inside each rule.
    pub sort_properties: bool,
    /// Write output over the input instead of beside it.
    pub overwrite: bool,
    /// Also write a gzip-compressed twin.
    pub gzip: bool,
    /// Prepended to the output file name.
    pub prefix: String,
    /// Append an 11-char content digest to the output file name.
    pub add_hash: bool,
}

/// Encoding of an explicitly requested output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Plain,
    Gzip,
}

/// Where a processor writes its result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Derive sibling paths from the input name (and gzip twin if requested).
    #[default]
    Derived,
    /// Write exactly one file at `path`. The `gzip` option is ignored; the
    /// caller picks the encoding.
    Exact { path: PathBuf, encoding: Encoding },
}

impl OutputTarget {
    pub fn exact(path: impl Into<PathBuf>, gzip: bool) -> Self {
        Self::Exact {
            path: path.into(),
            encoding: if gzip { Encoding::Gzip } else { Encoding::Plain },
        }
    }
}
