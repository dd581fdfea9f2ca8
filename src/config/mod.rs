//! Configuration management for `stylift.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── util       # config file discovery
//! └── mod.rs     # StyliftConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! [extract]
//! css_dir = "public/css"   # where stylesheets are written
//! href_prefix = "css"      # directory part of the link href
//! version = "1.0.0"        # ?v= cache-busting suffix
//! ```
//!
//! The file is optional. Precedence: CLI flags > config file > defaults.

mod error;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
use util::find_config_file;

use crate::{
    cli::Cli,
    extract::{DEFAULT_HREF_PREFIX, DEFAULT_VERSION, ExtractOptions},
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "stylift.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing stylift.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyliftConfig {
    /// Config file the values came from, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Base for relative paths in the file: its parent directory, or the
    /// working directory without a file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Report outcomes without writing anything (CLI only)
    #[serde(skip)]
    pub dry_run: bool,

    /// Extraction settings
    pub extract: ExtractConfig,
}

/// `[extract]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Directory extracted stylesheets are written to.
    pub css_dir: PathBuf,
    /// Directory part of the `href` in the inserted link.
    pub href_prefix: String,
    /// Cache-busting version appended as `?v=`.
    pub version: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            css_dir: PathBuf::from("css"),
            href_prefix: DEFAULT_HREF_PREFIX.into(),
            version: DEFAULT_VERSION.into(),
        }
    }
}

impl ExtractConfig {
    /// Link settings handed to the extractor.
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions {
            href_prefix: self.href_prefix.clone(),
            version: self.version.clone(),
        }
    }

    /// Validate extraction settings.
    ///
    /// # Checks
    /// - `version` must not be empty or contain whitespace
    /// - `href_prefix` must be relative and carry no trailing `/`
    /// - `css_dir` must not be empty
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.version.trim().is_empty() {
            diag.error("extract.version", "version must not be empty");
        } else if self.version.contains(char::is_whitespace) {
            diag.error(
                "extract.version",
                format!("`{}` contains whitespace", self.version),
            );
        }

        if self.href_prefix.starts_with('/') || self.href_prefix.ends_with('/') {
            diag.error_with_hint(
                "extract.href_prefix",
                format!("`{}` must not start or end with `/`", self.href_prefix),
                format!("use `{}`", self.href_prefix.trim_matches('/')),
            );
        }

        if self.css_dir.as_os_str().is_empty() {
            diag.error("extract.css_dir", "css_dir must not be empty");
        }
    }
}

impl StyliftConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Without `--config`, searches upward from cwd for `stylift.toml` and
    /// falls back to defaults when none exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    /// [`Self::load`] with an explicit working directory.
    fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    let err = io::Error::new(io::ErrorKind::NotFound, "config file not found");
                    bail!(ConfigError::Io(path, err));
                }
                Some(path)
            }
            None => find_config_file(cwd, Path::new(DEFAULT_CONFIG_NAME)),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        config.root = config_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        config.config_path = config_path;

        config.normalize_paths();
        config.apply_cli_options(cli, cwd);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
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
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve relative config-file paths against the root.
    fn normalize_paths(&mut self) {
        if self.extract.css_dir.is_relative() && !self.extract.css_dir.as_os_str().is_empty() {
            self.extract.css_dir = self.root.join(&self.extract.css_dir);
        }
    }

    /// Apply CLI overrides. CLI paths are relative to the working directory.
    fn apply_cli_options(&mut self, cli: &Cli, cwd: &Path) {
        if let Some(css_dir) = &cli.css_dir {
            self.extract.css_dir = cwd.join(css_dir);
        }
        if let Some(prefix) = &cli.href_prefix {
            self.extract.href_prefix = prefix.clone();
        }
        if let Some(version) = &cli.asset_version {
            self.extract.version = version.clone();
        }
        self.dry_run = cli.dry_run;
    }

    /// Validate all sections, reporting every problem at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.extract.validate(&mut diag);
        diag.into_result()
            .map_err(|diag| ConfigError::Diagnostics(diag).into())
    }
}

/// Parse a config snippet for tests, rejecting unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> StyliftConfig {
    let (parsed, ignored) = StyliftConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["stylift"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.extract.css_dir, PathBuf::from("css"));
        assert_eq!(config.extract.href_prefix, "css");
        assert_eq!(config.extract.version, "1.0.0");
        assert_eq!(config.extract.options(), ExtractOptions::default());
    }

    #[test]
    fn test_extract_section() {
        let config = test_parse_config(
            r#"
[extract]
css_dir = "public/css"
href_prefix = "assets/css"
version = "2.1.0"
"#,
        );
        assert_eq!(config.extract.css_dir, PathBuf::from("public/css"));
        assert_eq!(config.extract.href_prefix, "assets/css");
        assert_eq!(config.extract.version, "2.1.0");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = StyliftConfig::parse_with_ignored("[extract\nversion = \"1\"").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (config, ignored) =
            StyliftConfig::parse_with_ignored("[extract]\nversion = \"3\"\nminify = true\n")
                .unwrap();
        assert_eq!(config.extract.version, "3");
        assert_eq!(ignored, vec!["extract.minify".to_string()]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StyliftConfig::default();
        config.extract.version = " ".into();
        config.extract.href_prefix = "/css/".into();

        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err:?}");
        };
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(StyliftConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = StyliftConfig::load_from(&cli(&["index.html"]), dir.path()).unwrap();
        assert!(config.config_path.is_none());
        assert_eq!(config.extract.css_dir, dir.path().join("css"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_load_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("pages");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            "[extract]\ncss_dir = \"static/css\"\nversion = \"9\"\n",
        )
        .unwrap();

        let config = StyliftConfig::load_from(&cli(&["a.html"]), &nested).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.extract.css_dir, dir.path().join("static/css"));
        assert_eq!(config.extract.version, "9");
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            "[extract]\nversion = \"9\"\nhref_prefix = \"styles\"\n",
        )
        .unwrap();

        let args = cli(&[
            "--css-dir",
            "out",
            "--asset-version",
            "10",
            "--dry-run",
            "a.html",
        ]);
        let config = StyliftConfig::load_from(&args, dir.path()).unwrap();
        assert_eq!(config.extract.css_dir, dir.path().join("out"));
        assert_eq!(config.extract.version, "10");
        assert_eq!(config.extract.href_prefix, "styles");
        assert!(config.dry_run);
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        let err = StyliftConfig::load_from(&cli(&["-C", "nope.toml", "a.html"]), dir.path())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }
}
