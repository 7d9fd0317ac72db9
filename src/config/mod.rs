//! Run configuration from `assetmin.toml` merged with CLI flags.
//!
//! # Sections
//!
//! | Section      | Purpose                                              |
//! |--------------|------------------------------------------------------|
//! | `[minify]`   | Default processing flags (wrap, sort, prefix, ...)   |
//! | `[watch]`    | Poll interval in seconds                             |
//! | `[batch]`    | Worker count for folders                             |
//! | `[hooks]`    | `before` / `after` shell commands                    |
//!
//! Boolean flags given on the command line switch a feature on regardless of
//! the file; valued flags replace the file's value.

mod error;
mod util;

pub use error::ConfigError;
use util::find_config_file;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::asset::ProcessingOptions;
use crate::batch::{BatchSettings, DEFAULT_INTERVAL};
use crate::cli::Cli;
use crate::log;

// ============================================================================
// sections
// ============================================================================

/// `[minify]` defaults for every processed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MinifySection {
    pub wrap: bool,
    pub timestamp: bool,
    pub comments: bool,
    pub sort: bool,
    pub overwrite: bool,
    pub zipy: bool,
    pub prefix: String,
    pub hash: bool,
}

/// `[watch]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WatchSection {
    /// Seconds between two modification checks.
    pub interval: u64,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL.as_secs(),
        }
    }
}

/// `[batch]` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    /// Worker count; unset means host parallelism.
    pub jobs: Option<usize>,
}

/// `[hooks]` commands, run through the platform shell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HooksSection {
    pub before: Option<String>,
    pub after: Option<String>,
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `assetmin.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the loaded config file, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Whether to keep watching after the first pass (CLI only)
    #[serde(skip)]
    pub watch_enabled: bool,

    pub minify: MinifySection,
    pub watch: WatchSection,
    pub batch: BatchSection,
    pub hooks: HooksSection,
}

impl AppConfig {
    /// Load the config file (searched upward from cwd) and apply CLI overrides.
    ///
    /// A missing config file is not an error; defaults are used.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring: {}", path.display(), fields.join(", "));
    }

    /// Layer CLI flags over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        let m = &mut self.minify;
        m.wrap |= cli.wrap;
        m.timestamp |= cli.timestamp;
        m.comments |= cli.comments;
        m.sort |= cli.sort;
        m.overwrite |= cli.overwrite;
        m.zipy |= cli.zipy;
        m.hash |= cli.hash;
        if let Some(prefix) = &cli.prefix {
            m.prefix.clone_from(prefix);
        }

        if let Some(interval) = cli.interval {
            self.watch.interval = interval;
        }
        if cli.jobs.is_some() {
            self.batch.jobs = cli.jobs;
        }
        if cli.before.is_some() {
            self.hooks.before.clone_from(&cli.before);
        }
        if cli.after.is_some() {
            self.hooks.after.clone_from(&cli.after);
        }
        self.watch_enabled = cli.watch;
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.watch.interval == 0 {
            return Err(ConfigError::Validation(
                "watch interval must be at least 1 second".into(),
            ));
        }
        if self.batch.jobs == Some(0) {
            return Err(ConfigError::Validation("jobs must be at least 1".into()));
        }
        if self.minify.prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "prefix `{}` must not contain a path separator",
                self.minify.prefix
            )));
        }
        Ok(())
    }

    /// Options handed unchanged to every processor call.
    pub fn processing_options(&self) -> ProcessingOptions {
        let m = &self.minify;
        ProcessingOptions {
            wrap: m.wrap,
            timestamp: m.timestamp,
            keep_comments: m.comments,
            sort_properties: m.sort,
            overwrite: m.overwrite,
            gzip: m.zipy,
            prefix: m.prefix.clone(),
            add_hash: m.hash,
        }
    }

    /// Poll interval, when watching is enabled.
    pub fn watch_interval(&self) -> Option<Duration> {
        self.watch_enabled
            .then(|| Duration::from_secs(self.watch.interval))
    }

    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            jobs: self.batch.jobs,
            watch: self.watch_interval(),
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(content: &str) -> AppConfig {
        let (config, ignored) = AppConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty(), "unexpected unknown fields: {ignored:?}");
        config
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["assetmin", "target"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse("");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.watch.interval, 60);
        assert_eq!(config.processing_options(), ProcessingOptions::default());
    }

    #[test]
    fn test_parse_sections() {
        let config = parse(
            r#"
[minify]
wrap = true
prefix = "v1-"
zipy = true

[watch]
interval = 5

[batch]
jobs = 3

[hooks]
after = "echo done"
"#,
        );
        let options = config.processing_options();
        assert!(options.wrap && options.gzip);
        assert!(!options.sort_properties);
        assert_eq!(options.prefix, "v1-");
        assert_eq!(config.batch.jobs, Some(3));
        assert_eq!(config.hooks.after.as_deref(), Some("echo done"));
        assert_eq!(config.watch.interval, 5);
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) = AppConfig::parse_with_ignored(
            "[minify]\nwrap = true\nshrink = 1\n[extra]\nx = 1\n",
        )
        .unwrap();
        assert!(ignored.iter().any(|f| f.contains("shrink")));
        assert!(ignored.iter().any(|f| f.contains("extra")));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::parse_with_ignored("[minify\nwrap = true"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = parse("[minify]\nprefix = \"file-\"\nsort = true\n[watch]\ninterval = 9\n");
        config.apply_cli(&cli(&["--prefix", "cli-", "--wrap", "--watch", "--jobs", "2"]));

        let options = config.processing_options();
        assert_eq!(options.prefix, "cli-");
        assert!(options.wrap && options.sort_properties);

        let settings = config.batch_settings();
        assert_eq!(settings.jobs, Some(2));
        assert_eq!(settings.watch, Some(Duration::from_secs(9)));
    }

    #[test]
    fn test_no_watch_without_flag() {
        let mut config = parse("[watch]\ninterval = 3\n");
        config.apply_cli(&cli(&[]));
        assert_eq!(config.watch_interval(), None);
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.watch.interval = 0;
        assert!(config.validate().is_err());

        config.watch.interval = 1;
        config.minify.prefix = "a/b".into();
        assert!(config.validate().is_err());
    }
}
