//! `@font-face` extraction and URL rewriting over a parsed stylesheet.
//!
//! Uses lightningcss for parsing and printing. Only `@font-face` rules
//! survive. Every `url(...)` in them is handed to a callback that returns the
//! replacement URL. That covers typed `src` lists and also descriptors
//! lightningcss keeps as raw tokens (an unknown descriptor, or a `src` it
//! cannot type).

use lightningcss::properties::custom::{Token, TokenList, TokenOrValue};
use lightningcss::rules::CssRule;
use lightningcss::rules::font_face::{FontFaceProperty, Source};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::values::url::Url;

use crate::error::MirrorError;

/// Parse `css`, drop everything but `@font-face`, and rewrite each source URL.
///
/// `on_url` runs once per URL in document order. The first error it returns
/// aborts the pass and nothing is serialized.
pub fn rewrite_font_faces<F>(css: &str, mut on_url: F) -> Result<String, MirrorError>
where
    F: FnMut(&str) -> Result<String, MirrorError>,
{
    let mut sheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| MirrorError::Stylesheet(e.to_string()))?;

    sheet
        .rules
        .0
        .retain(|rule| matches!(rule, CssRule::FontFace(_)));

    for rule in &mut sheet.rules.0 {
        let CssRule::FontFace(face) = rule else {
            continue;
        };
        for property in &mut face.properties {
            match property {
                FontFaceProperty::Source(sources) => {
                    for source in sources.iter_mut() {
                        if let Source::Url(src) = source {
                            replace_url(&mut src.url, &mut on_url)?;
                        }
                    }
                }
                FontFaceProperty::Custom(custom) => {
                    rewrite_token_urls(&mut custom.value, &mut on_url)?;
                }
                _ => {}
            }
        }
    }

    let printed = sheet
        .to_css(PrinterOptions::default())
        .map_err(|e| MirrorError::Stylesheet(e.to_string()))?;
    Ok(printed.code)
}

fn replace_url<F>(url: &mut Url<'_>, on_url: &mut F) -> Result<(), MirrorError>
where
    F: FnMut(&str) -> Result<String, MirrorError>,
{
    let rewritten = on_url(&*url.url)?;
    url.url = rewritten.into();
    Ok(())
}

/// Walk a raw token list, descending into function arguments and
/// `var()`/`env()` fallbacks.
fn rewrite_token_urls<F>(tokens: &mut TokenList<'_>, on_url: &mut F) -> Result<(), MirrorError>
where
    F: FnMut(&str) -> Result<String, MirrorError>,
{
    for token in &mut tokens.0 {
        match token {
            TokenOrValue::Url(url) => replace_url(url, on_url)?,
            TokenOrValue::Token(Token::UnquotedUrl(url)) => {
                let rewritten = on_url(&**url)?;
                *url = rewritten.into();
            }
            TokenOrValue::Function(function) => {
                rewrite_token_urls(&mut function.arguments, on_url)?;
            }
            TokenOrValue::Var(var) => {
                if let Some(fallback) = &mut var.fallback {
                    rewrite_token_urls(fallback, on_url)?;
                }
            }
            TokenOrValue::Env(env) => {
                if let Some(fallback) = &mut env.fallback {
                    rewrite_token_urls(fallback, on_url)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
