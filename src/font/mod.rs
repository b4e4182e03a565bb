//! Mirrored font families and their on-disk state.
//!
//! ```text
//! <dest_root>/
//! ├── roboto.css            ← stylesheet_path, presence = "mirrored"
//! └── roboto/v30/*.woff2    ← assets, path mirrors the remote URL
//! ```

mod registry;

pub use registry::{FontRegistry, init};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::MirrorError;

/// Filesystem- and URL-safe name for a family: spaces removed, lowercased.
///
/// `"Open Sans"` → `"opensans"`.
pub fn slugify(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}

/// One requested font family and where its mirror lives.
///
/// Construction does no I/O. The font counts as mirrored once
/// [`stylesheet_path`](Self::stylesheet_path) exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMirror {
    name: String,
    slug: String,
    dest_root: PathBuf,
    stylesheet_path: PathBuf,
}

impl FontMirror {
    pub fn new(name: impl Into<String>, dest_root: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let dest_root = dest_root.into();
        let slug = slugify(&name);
        let stylesheet_path = dest_root.join(format!("{slug}.css"));
        Self {
            name,
            slug,
            dest_root,
            stylesheet_path,
        }
    }

    /// Family name exactly as sent to the CSS API.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    pub fn stylesheet_path(&self) -> &Path {
        &self.stylesheet_path
    }

    /// Presence check only; an empty or truncated file still counts.
    pub fn is_mirrored(&self) -> bool {
        self.stylesheet_path.exists()
    }

    /// Read the mirrored stylesheet back.
    ///
    /// A missing file is [`MirrorError::NotMirrored`], not an I/O failure.
    pub fn read_css(&self) -> Result<String, MirrorError> {
        fs::read_to_string(&self.stylesheet_path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => MirrorError::NotMirrored(self.name.clone()),
            _ => MirrorError::Read {
                path: self.stylesheet_path.clone(),
                source,
            },
        })
    }
}
