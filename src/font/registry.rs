//! Registry of configured fonts and startup initialization.

use std::fs;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::FontMirror;
use crate::config::FontSettings;
use crate::http::Fetch;
use crate::mirror::Mirror;
use crate::log;

/// Fonts configured for this process, in configuration order.
///
/// Built once at startup and passed by reference to whatever needs lookup by
/// family name. Stylesheet text read through [`css`](Self::css) is cached.
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: Vec<FontMirror>,
    css_cache: RwLock<FxHashMap<String, String>>,
}

impl FontRegistry {
    /// Build the registry without touching the filesystem or network.
    pub fn from_settings(settings: &FontSettings) -> Self {
        let fonts = settings
            .families
            .iter()
            .map(|name| FontMirror::new(name.as_str(), settings.dest_root.as_path()))
            .collect();
        Self {
            fonts,
            css_cache: RwLock::default(),
        }
    }

    /// Exact-name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&FontMirror> {
        self.fonts.iter().find(|font| font.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontMirror> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Fonts whose stylesheet is present on disk.
    pub fn mirrored_count(&self) -> usize {
        self.fonts.iter().filter(|font| font.is_mirrored()).count()
    }

    /// Mirrored stylesheet text for `name`.
    ///
    /// Unknown and unmirrored families are logged and yield `None`.
    pub fn css(&self, name: &str) -> Option<String> {
        if let Some(css) = self.css_cache.read().get(name) {
            return Some(css.clone());
        }

        let Some(font) = self.find_by_name(name) else {
            log!("error"; "font `{}` is not configured", name);
            return None;
        };

        match font.read_css() {
            Ok(css) => {
                self.css_cache.write().insert(name.to_string(), css.clone());
                Some(css)
            }
            Err(err) => {
                log!("error"; "failed to find css for font: {}, {}", name, err);
                None
            }
        }
    }
}

/// Startup hook: prepare the destination and mirror every configured family.
///
/// Families that fail to mirror are logged and still registered; callers can
/// check [`FontMirror::is_mirrored`]. Only a destination that cannot be
/// created is an error.
pub fn init<F: Fetch>(settings: &FontSettings, fetch: F) -> Result<FontRegistry> {
    fs::create_dir_all(&settings.dest_root).with_context(|| {
        format!(
            "failed to create font directory `{}`",
            settings.dest_root.display()
        )
    })?;

    for name in &settings.families {
        if has_lowercase_word(name) {
            log!(
                "warning";
                "font families usually have capitalized first letters, check the spelling of `{}`",
                name
            );
        }
    }

    let registry = FontRegistry::from_settings(settings);
    let mirror = Mirror::new(fetch, settings.options.clone());
    for font in registry.iter() {
        mirror.ensure(font);
    }

    Ok(registry)
}

/// True if any space-separated word is entirely lowercase (`"Open sans"`).
fn has_lowercase_word(name: &str) -> bool {
    name.split(' ').any(|word| {
        word.chars().any(char::is_lowercase) && !word.chars().any(char::is_uppercase)
    })
}
