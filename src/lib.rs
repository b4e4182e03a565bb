//! Fontmirror - mirror Google Fonts stylesheets and font files locally.
//!
//! ```ignore
//! let registry = font::init(&settings, HttpClient::new(settings.options.timeout))?;
//! let css = registry.css("Open Sans");
//! ```

pub mod logger;

pub mod cli;
pub mod config;
pub mod error;
pub mod font;
pub mod http;
pub mod mirror;

pub use error::MirrorError;
pub use font::{FontMirror, FontRegistry, init};
pub use mirror::{Mirror, MirrorOptions};
