//! Stylesheet fetching, asset download and URL rewriting.
//!
//! # Pipeline
//!
//! ```text
//! GET css2?family=<name> ──► parse ──► @font-face rules
//!                                          │
//!                      for each url(...) ──┤
//!                                          ├─► GET asset ──► <dest_root>/<relative path>
//!                                          └─► rewrite prefix ──► <local_url><relative path>
//!                                          │
//!                        serialize rules ──► <dest_root>/<slug>.css
//! ```
//!
//! The stylesheet is written last, so a failed run never replaces a stylesheet
//! left by an earlier successful run.

pub mod rewrite;
mod stylesheet;

use std::fs;
use std::path::Path;
use std::time::Duration;

use url::form_urlencoded;

use crate::error::MirrorError;
use crate::font::FontMirror;
use crate::http::{Fetch, FetchResponse};
use crate::{debug, log};

pub use rewrite::AssetReference;
pub use stylesheet::rewrite_font_faces;

/// Remote CSS API endpoint.
pub const CSS_URL: &str = "https://fonts.googleapis.com/css2";

/// Every asset URL in a served stylesheet starts with this.
pub const ASSET_PREFIX: &str = "https://fonts.gstatic.com/s/";

/// The CSS API varies its output by client; a desktop Chrome agent gets plain
/// `url(...)` sources in woff2.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default URL base for rewritten references.
pub const DEFAULT_LOCAL_URL: &str = "/static/fonts/";

/// Plain values the pipeline needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOptions {
    /// Replacement for [`ASSET_PREFIX`] in the written stylesheet. Ends with `/`.
    pub local_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            local_url: DEFAULT_LOCAL_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Outcome of a completed mirror run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorReport {
    /// Number of assets downloaded and written.
    pub assets: usize,
}

/// Mirrors fonts through a [`Fetch`] transport.
pub struct Mirror<F> {
    fetch: F,
    options: MirrorOptions,
}

impl<F: Fetch> Mirror<F> {
    pub fn new(fetch: F, options: MirrorOptions) -> Self {
        Self { fetch, options }
    }

    /// Mirror `font` unless its stylesheet already exists.
    ///
    /// Returns `true` when the font is mirrored afterwards. Failures are
    /// logged, never propagated.
    pub fn ensure(&self, font: &FontMirror) -> bool {
        if font.is_mirrored() {
            debug!("mirror"; "{}: cached at {}", font.name(), font.stylesheet_path().display());
            return true;
        }

        match self.mirror(font) {
            Ok(report) => {
                log!("mirror"; "{} ({} files)", font.name(), report.assets);
                true
            }
            Err(err) => {
                log!("error"; "failed to get font: {}, {}", font.name(), err);
                false
            }
        }
    }

    /// Fetch, download and rewrite unconditionally.
    ///
    /// Assets already written before a failure are left on disk.
    pub fn mirror(&self, font: &FontMirror) -> Result<MirrorReport, MirrorError> {
        let css_url = css_request_url(font.name());
        let response = self.get(&css_url, Some(&self.options.user_agent))?;
        let input = String::from_utf8(response.body)
            .map_err(|e| MirrorError::Stylesheet(format!("response is not UTF-8: {e}")))?;

        let mut assets = 0;
        let output = rewrite_font_faces(&input, |url| {
            let asset = AssetReference::parse(url)?;
            let body = self.get(asset.remote_url, None)?.body;

            let dest = asset.local_path(font.dest_root());
            write_file(&dest, &body)?;
            debug!("mirror"; "{} -> {}", asset.relative_path, dest.display());

            assets += 1;
            Ok(asset.rewritten(&self.options.local_url))
        })?;

        write_stylesheet(font.stylesheet_path(), &output)?;
        Ok(MirrorReport { assets })
    }

    /// GET that treats anything but 200 as an error.
    fn get(&self, url: &str, user_agent: Option<&str>) -> Result<FetchResponse, MirrorError> {
        let response = self
            .fetch
            .get(url, user_agent)
            .map_err(|source| MirrorError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.is_ok() {
            return Err(MirrorError::Status {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(response)
    }
}

/// `CSS_URL?family=<name>`, form-encoded.
pub fn css_request_url(family: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("family", family)
        .finish();
    format!("{CSS_URL}?{query}")
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), MirrorError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MirrorError::write(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| MirrorError::write(path, e))
}

/// Write via a sibling temp file and rename, so readers never see a partial file.
fn write_stylesheet(path: &Path, css: &str) -> Result<(), MirrorError> {
    let tmp = path.with_extension("css.tmp");
    write_file(&tmp, css.as_bytes())?;
    fs::rename(&tmp, path).map_err(|e| MirrorError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{FailingFetch, MockFetch};
    use tempfile::TempDir;

    const ROBOTO_CSS: &str = "/* cyrillic-ext */
@font-face {
  font-family: 'Roboto';
  font-style: normal;
  font-weight: 400;
  src: url(https://fonts.gstatic.com/s/roboto/v30/KFOmCnqEu92Fr1Mu72xKKTU1Kvnz.woff2) format('woff2');
  unicode-range: U+0460-052F, U+1C80-1C88, U+20B4, U+2DE0-2DFF, U+A640-A69F, U+FE2E-FE2F;
}
";
    const ROBOTO_CSS_URL: &str = "https://fonts.googleapis.com/css2?family=Roboto";
    const ROBOTO_ASSET: &str =
        "https://fonts.gstatic.com/s/roboto/v30/KFOmCnqEu92Fr1Mu72xKKTU1Kvnz.woff2";
    const WOFF2: &[u8] = b"wOF2\x00\x01fake-font-bytes";

    fn roboto_mock() -> MockFetch {
        MockFetch::new()
            .route(ROBOTO_CSS_URL, 200, ROBOTO_CSS)
            .route(ROBOTO_ASSET, 200, WOFF2)
    }

    fn setup() -> (TempDir, FontMirror) {
        let dir = TempDir::new().unwrap();
        let font = FontMirror::new("Roboto", dir.path());
        (dir, font)
    }

    #[test]
    fn test_css_request_url() {
        assert_eq!(css_request_url("Roboto"), ROBOTO_CSS_URL);
        assert_eq!(
            css_request_url("Open Sans"),
            "https://fonts.googleapis.com/css2?family=Open+Sans"
        );
    }

    #[test]
    fn test_rewrites_and_writes_asset() {
        let (dir, font) = setup();
        let mock = roboto_mock();
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        let report = mirror.mirror(&font).unwrap();
        assert_eq!(report.assets, 1);

        let css = fs::read_to_string(font.stylesheet_path()).unwrap();
        assert!(css.contains("/static/fonts/roboto/v30/KFOmCnqEu92Fr1Mu72xKKTU1Kvnz.woff2"));
        assert!(!css.contains(ASSET_PREFIX));

        let asset = dir
            .path()
            .join("roboto")
            .join("v30")
            .join("KFOmCnqEu92Fr1Mu72xKKTU1Kvnz.woff2");
        assert_eq!(fs::read(asset).unwrap(), WOFF2);
        assert!(!font.stylesheet_path().with_extension("css.tmp").exists());
    }

    #[test]
    fn test_request_shape() {
        let (_dir, font) = setup();
        let mock = roboto_mock();
        Mirror::new(&mock, MirrorOptions::default())
            .mirror(&font)
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].url, ROBOTO_CSS_URL);
        assert_eq!(calls[0].user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
        assert_eq!(calls[1].url, ROBOTO_ASSET);
    }

    #[test]
    fn test_custom_user_agent() {
        let (_dir, font) = setup();
        let mock = roboto_mock();
        let options = MirrorOptions {
            user_agent: "curl/8.0".into(),
            ..MirrorOptions::default()
        };
        Mirror::new(&mock, options).mirror(&font).unwrap();

        assert_eq!(mock.calls()[0].user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn test_custom_local_url() {
        let (_dir, font) = setup();
        let mock = roboto_mock();
        let options = MirrorOptions {
            local_url: "blah/".into(),
            ..MirrorOptions::default()
        };
        Mirror::new(&mock, options).mirror(&font).unwrap();

        let css = fs::read_to_string(font.stylesheet_path()).unwrap();
        assert!(css.contains("blah/roboto/v30/KFOmCnqEu92Fr1Mu72xKKTU1Kvnz.woff2"));
        assert!(!css.contains("/static/fonts/"));
    }

    #[test]
    fn test_css_failure_writes_nothing() {
        let (dir, font) = setup();
        let mock = MockFetch::new().route(ROBOTO_CSS_URL, 500, "oops");
        let err = Mirror::new(&mock, MirrorOptions::default())
            .mirror(&font)
            .unwrap_err();

        assert!(matches!(err, MirrorError::Status { status: 500, .. }));
        assert!(!font.is_mirrored());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_asset_failure_aborts() {
        let (_dir, font) = setup();
        let mock = MockFetch::new()
            .route(ROBOTO_CSS_URL, 200, ROBOTO_CSS)
            .route(ROBOTO_ASSET, 404, Vec::new());
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        let err = mirror.mirror(&font).unwrap_err();
        assert!(matches!(err, MirrorError::Status { status: 404, ref url } if url == ROBOTO_ASSET));
        assert!(!font.is_mirrored());
        assert!(!mirror.ensure(&font));
    }

    #[test]
    fn test_asset_failure_keeps_previous_stylesheet() {
        let (_dir, font) = setup();
        fs::write(font.stylesheet_path(), "/* previous */").unwrap();

        let mock = MockFetch::new()
            .route(ROBOTO_CSS_URL, 200, ROBOTO_CSS)
            .route(ROBOTO_ASSET, 503, Vec::new());
        assert!(
            Mirror::new(&mock, MirrorOptions::default())
                .mirror(&font)
                .is_err()
        );

        assert_eq!(
            fs::read_to_string(font.stylesheet_path()).unwrap(),
            "/* previous */"
        );
    }

    #[test]
    fn test_foreign_asset_host_aborts() {
        let (_dir, font) = setup();
        let css = ROBOTO_CSS.replace("https://fonts.gstatic.com/s/", "https://cdn.example.com/");
        let mock = MockFetch::new().route(ROBOTO_CSS_URL, 200, css);

        let err = Mirror::new(&mock, MirrorOptions::default())
            .mirror(&font)
            .unwrap_err();
        assert!(matches!(err, MirrorError::UnsupportedAssetUrl(_)));
        assert!(!font.is_mirrored());
        // Rejected before any download is attempted.
        assert_eq!(mock.call_count(), 1);
    }

    const UNTYPED_CSS: &str = "@font-face {
  font-family: 'Roboto';
  src: url(https://fonts.gstatic.com/s/roboto/v30/a.woff2) format('woff2') tech(bogus);
}
";
    const UNTYPED_ASSET: &str = "https://fonts.gstatic.com/s/roboto/v30/a.woff2";

    #[test]
    fn test_untyped_src_is_downloaded_and_rewritten() {
        let (dir, font) = setup();
        let mock = MockFetch::new()
            .route(ROBOTO_CSS_URL, 200, UNTYPED_CSS)
            .route(UNTYPED_ASSET, 200, WOFF2);
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        assert!(mirror.ensure(&font));
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.calls()[1].url, UNTYPED_ASSET);

        let css = fs::read_to_string(font.stylesheet_path()).unwrap();
        assert!(css.contains("/static/fonts/roboto/v30/a.woff2"));
        assert!(!css.contains(ASSET_PREFIX));
        assert_eq!(
            fs::read(dir.path().join("roboto").join("v30").join("a.woff2")).unwrap(),
            WOFF2
        );
    }

    #[test]
    fn test_untyped_src_foreign_host_aborts() {
        let (_dir, font) = setup();
        let css = UNTYPED_CSS.replace(ASSET_PREFIX, "https://cdn.example.com/");
        let mock = MockFetch::new().route(ROBOTO_CSS_URL, 200, css);
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        let err = mirror.mirror(&font).unwrap_err();
        assert!(matches!(err, MirrorError::UnsupportedAssetUrl(_)));
        assert!(!mirror.ensure(&font));
        assert!(!font.is_mirrored());
    }

    #[test]
    fn test_local_write_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("fonts");
        fs::write(&blocker, "not a directory").unwrap();
        let font = FontMirror::new("Roboto", &blocker);

        let mock = roboto_mock();
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        let err = mirror.mirror(&font).unwrap_err();
        assert!(matches!(err, MirrorError::Write { .. }));
        assert!(!err.is_remote());
        assert!(!mirror.ensure(&font));
        assert!(!font.is_mirrored());
    }

    #[test]
    fn test_non_utf8_stylesheet() {
        let (dir, font) = setup();
        let mock = MockFetch::new().route(ROBOTO_CSS_URL, 200, b"\xff\xfe".to_vec());
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        let err = mirror.mirror(&font).unwrap_err();
        assert!(matches!(err, MirrorError::Stylesheet(_)));
        assert!(!mirror.ensure(&font));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_transport_failure() {
        let (_dir, font) = setup();
        let mirror = Mirror::new(FailingFetch, MirrorOptions::default());

        let err = mirror.mirror(&font).unwrap_err();
        assert!(err.is_remote());
        assert!(!mirror.ensure(&font));
    }

    #[test]
    fn test_rule_filtering() {
        let (_dir, font) = setup();
        let css = format!("body {{ font-family: 'Roboto'; color: red; }}\n{ROBOTO_CSS}");
        let mock = MockFetch::new()
            .route(ROBOTO_CSS_URL, 200, css)
            .route(ROBOTO_ASSET, 200, WOFF2);
        Mirror::new(&mock, MirrorOptions::default())
            .mirror(&font)
            .unwrap();

        let output = fs::read_to_string(font.stylesheet_path()).unwrap();
        assert!(output.contains("@font-face"));
        assert!(!output.contains("body"));
        assert!(!output.contains("color"));
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let (_dir, font) = setup();
        let mock = roboto_mock();
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        assert!(mirror.ensure(&font));
        let first = fs::read_to_string(font.stylesheet_path()).unwrap();
        let calls = mock.call_count();

        assert!(mirror.ensure(&font));
        assert_eq!(mock.call_count(), calls);
        assert_eq!(fs::read_to_string(font.stylesheet_path()).unwrap(), first);
        assert_eq!(
            mock.calls()
                .iter()
                .filter(|c| c.url == ROBOTO_CSS_URL)
                .count(),
            1
        );
    }

    #[test]
    fn test_empty_stylesheet_still_mirrors() {
        let (_dir, font) = setup();
        let mock = MockFetch::new().route(ROBOTO_CSS_URL, 200, "");
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        assert!(mirror.ensure(&font));
        assert!(font.is_mirrored());
        assert!(mirror.ensure(&font));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_remirror_after_external_delete() {
        let (_dir, font) = setup();
        let mock = roboto_mock();
        let mirror = Mirror::new(&mock, MirrorOptions::default());

        assert!(mirror.ensure(&font));
        fs::remove_file(font.stylesheet_path()).unwrap();
        assert!(mirror.ensure(&font));
        assert_eq!(mock.call_count(), 4);
    }
}
