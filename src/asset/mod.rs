//! Asset classification, path derivation and processing.

pub mod derive;
mod error;
mod kind;
pub mod minify;
mod options;
mod process;
mod scan;
mod write;

// Types
pub use error::AssetError;
pub use kind::AssetKind;
pub use options::{Encoding, OutputTarget, ProcessingOptions};

// Scanning (pure functions)
pub use scan::{ScanFilter, scan_tree};

// Processing (side effects)
pub use process::{
    ProcessedAsset, process_asset, process_markup, process_script, process_stylesheet,
};
