//! Subcommand implementations.

use std::io::{Write, stdout};

use anyhow::{Result, anyhow, bail};
use owo_colors::OwoColorize;

use crate::config::Config;
use crate::font::{self, FontRegistry};
use crate::http::HttpClient;
use crate::log;

/// `fontmirror mirror`: run startup mirroring for every family.
pub fn mirror(config: &Config) -> Result<()> {
    let settings = config.settings()?;
    let client = HttpClient::new(settings.options.timeout);
    let registry = font::init(&settings, client)?;

    let mirrored = registry.mirrored_count();
    let total = registry.len();
    log!(
        "fonts";
        "{}/{} families mirrored to {}",
        mirrored,
        total,
        settings.dest_root.display()
    );

    let failed = total - mirrored;
    if failed > 0 {
        bail!("{} of {} font families failed to mirror", failed, total);
    }
    Ok(())
}

/// `fontmirror css <family>`: print a mirrored stylesheet.
pub fn css(config: &Config, family: &str) -> Result<()> {
    let registry = FontRegistry::from_settings(&config.settings()?);
    let css = registry
        .css(family)
        .ok_or_else(|| anyhow!("no mirrored stylesheet for `{}`", family))?;

    let mut stdout = stdout().lock();
    stdout.write_all(css.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// `fontmirror status`: list configured families and their mirror state.
pub fn status(config: &Config) -> Result<()> {
    let registry = FontRegistry::from_settings(&config.settings()?);

    for font in registry.iter() {
        let state = if font.is_mirrored() {
            "mirrored".green().to_string()
        } else {
            "missing".red().to_string()
        };
        println!(
            "{:<24} {:<8} {} {}",
            font.name(),
            state,
            font.slug().dimmed(),
            font.stylesheet_path().display()
        );
    }

    log!("fonts"; "{}/{} families mirrored", registry.mirrored_count(), registry.len());
    Ok(())
}
