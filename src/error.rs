//! Mirror pipeline errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::http::TransportError;

/// Everything that can stop a font from being mirrored or read back.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Remote answered with something other than 200.
    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Request never completed (timeout, DNS, connection reset).
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("asset URL `{0}` is not served from {prefix}", prefix = crate::mirror::ASSET_PREFIX)]
    UnsupportedAssetUrl(String),

    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid stylesheet: {0}")]
    Stylesheet(String),

    #[error("font `{0}` has not been mirrored")]
    NotMirrored(String),

    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MirrorError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Whether this is the "nothing mirrored yet" outcome rather than a failure.
    pub const fn is_not_mirrored(&self) -> bool {
        matches!(self, Self::NotMirrored(_))
    }

    /// Whether the remote side (status or transport) caused the failure.
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Transport { .. })
    }
}
