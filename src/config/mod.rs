//! Configuration management for `fontmirror.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── fonts      # [fonts]
//! │   ├── http       # [http]
//! │   └── statics    # [static]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! ├── util.rs        # Config discovery and path helpers
//! └── mod.rs         # Config, FontSettings (this file)
//! ```
//!
//! The core never reads this module's types directly. [`Config::settings`]
//! turns a validated config into plain [`FontSettings`] values.

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, normalize_path, resolve_path};

pub use section::{FontsConfig, HttpConfig, StaticConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands},
    log,
    mirror::MirrorOptions,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing fontmirror.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Families to mirror and where they go
    #[serde(default)]
    pub fonts: FontsConfig,

    /// Host static file settings (fallbacks for `[fonts]`)
    #[serde(default, rename = "static")]
    pub statics: StaticConfig,

    /// Outgoing request settings
    #[serde(default)]
    pub http: HttpConfig,
}

/// Validated, fully-resolved values handed to [`crate::font::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSettings {
    pub families: Vec<String>,
    /// Absolute directory receiving stylesheets and assets.
    pub dest_root: PathBuf,
    pub options: MirrorOptions,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. Relative paths in
    /// the file resolve against the config file's directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path =
            find_config_file(&cli.config).ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = normalize_path(&config_path);

        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.apply_cli(cli);
        config.normalize_paths(&root);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
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
        .map_err(ConfigError::Toml)?;
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

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides on top of the file.
    ///
    /// A relative `--dir` is taken from cwd, not from the config root.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.dir {
            self.fonts.dir = Some(normalize_path(dir));
        }
        if let Some(url) = &cli.url {
            self.fonts.url = Some(url.clone());
        }

        if let Commands::Mirror {
            user_agent,
            timeout,
        } = &cli.command
        {
            Self::update_option(&mut self.http.user_agent, user_agent.as_ref());
            Self::update_option(&mut self.http.timeout, timeout.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve every configured directory against `root`.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);

        if let Some(dir) = self.fonts.dir.take() {
            self.fonts.dir = Some(resolve_path(&dir, &root));
        }
        self.statics.dirs = self
            .statics
            .dirs
            .iter()
            .map(|dir| resolve_path(dir, &root))
            .collect();

        self.root = root;
    }

    // ========================================================================
    // derived values
    // ========================================================================

    /// `<fonts.dir>/fonts`, falling back to `<static.dirs[0]>/fonts`.
    pub fn dest_root(&self) -> Option<PathBuf> {
        self.fonts
            .dir
            .as_ref()
            .or_else(|| self.statics.dirs.first())
            .map(|dir| dir.join("fonts"))
    }

    /// `fonts.url`, falling back to `<static.url>fonts/`.
    pub fn local_url(&self) -> Option<String> {
        self.fonts.url.clone().or_else(|| {
            self.statics
                .url
                .as_ref()
                .map(|url| format!("{url}fonts/"))
        })
    }

    pub fn mirror_options(&self) -> Option<MirrorOptions> {
        Some(MirrorOptions {
            local_url: self.local_url()?,
            user_agent: self.http.user_agent.clone(),
            timeout: Duration::from_secs(self.http.timeout),
        })
    }

    /// Resolve the plain values the core needs.
    pub fn settings(&self) -> Result<FontSettings, ConfigError> {
        let dest_root = self
            .dest_root()
            .ok_or_else(|| ConfigError::Validation("no font destination directory".into()))?;
        let options = self
            .mirror_options()
            .ok_or_else(|| ConfigError::Validation("no font URL base".into()))?;

        Ok(FontSettings {
            families: self.fonts.families.clone(),
            dest_root,
            options,
        })
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.fonts.validate(&mut diag);
        self.statics.validate(&mut diag);
        self.http.validate(&mut diag);

        if self.local_url().is_none() {
            diag.error_with_hint(
                StaticConfig::URL,
                "either `static.url` or `fonts.url` must be set",
                "add `url = \"/static/\"` under [static]",
            );
        }

        if self.dest_root().is_none() {
            diag.error_with_hint(
                StaticConfig::DIRS,
                "either `fonts.dir` or `static.dirs` must be set",
                "add `dirs = [\"static\"]` under [static]",
            );
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
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
