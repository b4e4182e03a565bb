//! `[fonts]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [fonts]
//! families = ["Roboto", "Open Sans"]   # Family names as listed on Google Fonts
//! dir = "assets"                       # Fonts land in <dir>/fonts
//! url = "/assets/fonts/"               # URL base written into the stylesheets
//! ```
//!
//! `dir` falls back to `static.dirs[0]` and `url` to `<static.url>fonts/`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Font families to mirror and where they go.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Family names, case and spacing preserved for the CSS API.
    pub families: Vec<String>,

    /// Parent of the `fonts/` destination directory.
    pub dir: Option<PathBuf>,

    /// URL base replacing the remote asset host. Must end with `/`.
    pub url: Option<String>,
}

impl FontsConfig {
    pub const FAMILIES: FieldPath = FieldPath::new("fonts.families");
    pub const DIR: FieldPath = FieldPath::new("fonts.dir");
    pub const URL: FieldPath = FieldPath::new("fonts.url");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.families.is_empty() {
            diag.error_with_hint(
                Self::FAMILIES,
                "no font families configured",
                "add `families = [\"Roboto\"]` under [fonts]",
            );
        }

        if self.families.iter().any(|f| f.trim().is_empty()) {
            diag.error(Self::FAMILIES, "family names must not be empty");
        }

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
