//! Asset kind definitions.

use std::fmt;
use std::path::Path;

/// Kind of minifiable asset, determined by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Stylesheet (.css)
    Stylesheet,
    /// Markup (.htm, or .html when overwriting in place)
    Markup,
    /// Script (.js)
    Script,
}

impl AssetKind {
    pub const ALL: [Self; 3] = [Self::Stylesheet, Self::Markup, Self::Script];

    /// Detect asset kind from a lowercased extension (without dot).
    ///
    /// Markup input is `.htm` normally and `.html` when overwriting, since
    /// `.htm` files minify into `.html` siblings.
    pub fn from_extension(ext: &str, overwrite: bool) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "css" => Some(Self::Stylesheet),
            "js" => Some(Self::Script),
            "htm" if !overwrite => Some(Self::Markup),
            "html" if overwrite => Some(Self::Markup),
            _ => None,
        }
    }

    /// Detect asset kind from file path.
    pub fn from_path(path: &Path, overwrite: bool) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| Self::from_extension(e, overwrite))
    }

    /// Extension the input file carries (the deriver's `old` suffix).
    pub const fn source_suffix(self, overwrite: bool) -> &'static str {
        match (self, overwrite) {
            (Self::Stylesheet, _) => ".css",
            (Self::Script, _) => ".js",
            (Self::Markup, false) => ".htm",
            (Self::Markup, true) => ".html",
        }
    }

    /// Extension of the minified output.
    pub const fn minified_suffix(self, overwrite: bool) -> &'static str {
        match (self, overwrite) {
            (Self::Stylesheet, false) => ".min.css",
            (Self::Stylesheet, true) => ".css",
            (Self::Script, false) => ".min.js",
            (Self::Script, true) => ".js",
            (Self::Markup, _) => ".html",
        }
    }

    /// Extension of the gzip twin, `None` for kinds without gzip output.
    pub const fn gzip_suffix(self, overwrite: bool) -> Option<&'static str> {
        if !self.supports_gzip() {
            return None;
        }
        Some(match (self, overwrite) {
            (Self::Stylesheet, false) => ".min.css.gz",
            (Self::Stylesheet, true) => ".css.gz",
            (_, false) => ".min.js.gz",
            (_, true) => ".js.gz",
        })
    }

    /// File name suffix that marks an already processed artifact of this kind.
    ///
    /// The scanner skips these so a run never re-minifies its own output.
    pub const fn artifact_suffix(self, overwrite: bool) -> &'static str {
        match (self, overwrite) {
            (Self::Stylesheet, _) => ".min.css",
            (Self::Script, _) => ".min.js",
            (Self::Markup, false) => ".html",
            (Self::Markup, true) => ".htm",
        }
    }

    pub const fn supports_gzip(self) -> bool {
        matches!(self, Self::Stylesheet | Self::Script)
    }

    pub const fn supports_timestamp(self) -> bool {
        matches!(self, Self::Stylesheet | Self::Script)
    }

    /// Short name, also used as log module.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stylesheet => "css",
            Self::Markup => "html",
            Self::Script => "js",
        }
    }

    /// Scanner include list for a run.
    pub fn include_suffixes(overwrite: bool) -> Vec<&'static str> {
        Self::ALL
            .iter()
            .map(|kind| kind.source_suffix(overwrite))
            .collect()
    }

    /// Scanner exclude list for a run.
    pub fn exclude_suffixes(overwrite: bool) -> Vec<&'static str> {
        Self::ALL
            .iter()
            .map(|kind| kind.artifact_suffix(overwrite))
            .collect()
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
