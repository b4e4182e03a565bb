//! Asset URL handling: prefix stripping, local paths, token rewriting.
//!
//! ```text
//! https://fonts.gstatic.com/s/roboto/v30/KFOm.woff2
//! └──────── ASSET_PREFIX ─────┘└─ relative path ──┘
//!
//! disk:  <dest_root>/roboto/v30/KFOm.woff2
//! css:   <local_url>roboto/v30/KFOm.woff2
//! ```

use std::path::{Path, PathBuf};

use super::ASSET_PREFIX;
use crate::error::MirrorError;

/// One `url(...)` found in a stylesheet, valid only for the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetReference<'a> {
    pub remote_url: &'a str,
    /// Portion of `remote_url` after [`ASSET_PREFIX`].
    pub relative_path: &'a str,
}

impl<'a> AssetReference<'a> {
    pub fn parse(remote_url: &'a str) -> Result<Self, MirrorError> {
        Ok(Self {
            remote_url,
            relative_path: asset_relative_path(remote_url)?,
        })
    }

    pub fn local_path(&self, dest_root: &Path) -> PathBuf {
        local_asset_path(dest_root, self.relative_path)
    }

    pub fn rewritten(&self, local_url: &str) -> String {
        rewrite_url(self.remote_url, local_url)
    }
}

/// Strip [`ASSET_PREFIX`] from an asset URL.
///
/// URLs served from anywhere else are rejected. Path components that would
/// escape the destination root (`..`, `.`) are rejected the same way.
pub fn asset_relative_path(url: &str) -> Result<&str, MirrorError> {
    let relative = url
        .strip_prefix(ASSET_PREFIX)
        .filter(|rest| !rest.is_empty())
        .ok_or_else(|| MirrorError::UnsupportedAssetUrl(url.to_string()))?;

    if relative.split('/').any(|part| part == ".." || part == ".") {
        return Err(MirrorError::UnsupportedAssetUrl(url.to_string()));
    }

    Ok(relative)
}

/// Local file for a relative asset path, one path component per URL segment.
pub fn local_asset_path(dest_root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(dest_root.to_path_buf(), |path, part| path.join(part))
}

/// Rewrite one serialized URL token to point at the local mirror.
///
/// Literal substring replace of [`ASSET_PREFIX`] with `local_url`; the URL is
/// never parsed. `local_url` is expected to end with `/`.
#[inline]
pub fn rewrite_url(token: &str, local_url: &str) -> String {
    token.replace(ASSET_PREFIX, local_url)
}
