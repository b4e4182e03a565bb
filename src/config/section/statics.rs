//! `[static]` section configuration.
//!
//! Describes how the host application serves static files. Used to derive the
//! font destination and URL base when `[fonts]` does not set them.
//!
//! # Example
//!
//! ```toml
//! [static]
//! url = "/static/"        # Public URL of the static root (trailing slash)
//! dirs = ["static"]       # Static source directories, first one wins
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Static file serving settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Public URL prefix of static files.
    pub url: Option<String>,

    /// Static directories; fonts go under the first one.
    pub dirs: Vec<PathBuf>,
}

impl StaticConfig {
    pub const URL: FieldPath = FieldPath::new("static.url");
    pub const DIRS: FieldPath = FieldPath::new("static.dirs");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(url) = &self.url
            && !url.ends_with('/')
        {
            diag.error_with_hint(
                Self::URL,
                format!("`{url}` must end with `/`"),
                format!("use `{url}/`"),
            );
        }
    }
}
