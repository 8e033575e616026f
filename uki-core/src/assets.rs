//! Rewrites `<img src="...">` paths so they resolve against the wiki's
//! assets directory from an article nested `depth` directories deep.

use crate::config::ASSETS_ROOT;
use crate::edit::EditList;
use crate::path;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Malformed image tag at byte {offset}")]
    MalformedMarkup { offset: usize },
}

static IMAGE_REGEX: OnceLock<Regex> = OnceLock::new();
static IMAGE_OPEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn image_regex() -> &'static Regex {
    IMAGE_REGEX.get_or_init(|| Regex::new(r#"(?i)<img\s+src="([^"]+)""#).unwrap())
}

fn image_open_regex() -> &'static Regex {
    IMAGE_OPEN_REGEX.get_or_init(|| Regex::new(r#"(?i)<img\s+src=""#).unwrap())
}

/// Prefix every relative image path in `text` with `depth` parent
/// references and the assets directory.
///
/// ```
/// use uki_core::assets::rewrite_asset_paths;
///
/// let html = r#"<img src="a/b.png">"#;
/// assert_eq!(
///     rewrite_asset_paths(html, 2).unwrap(),
///     r#"<img src="../../assets/a/b.png">"#
/// );
/// ```
pub fn rewrite_asset_paths(text: &str, depth: usize) -> Result<String, AssetError> {
    let mut edits = EditList::new(text);
    let mut matched_starts = Vec::new();

    for captures in image_regex().captures_iter(text) {
        let (Some(whole), Some(src)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        matched_starts.push(whole.start());

        if !is_relative(src.as_str()) {
            continue;
        }

        let rewritten = asset_path(src.as_str(), depth);
        tracing::debug!("Rewriting image path {} -> {}", src.as_str(), rewritten);
        edits.push(src.range(), rewritten);
    }

    // Every opener must have produced a complete match.
    if let Some(open) = image_open_regex()
        .find_iter(text)
        .find(|m| matched_starts.binary_search(&m.start()).is_err())
    {
        return Err(AssetError::MalformedMarkup {
            offset: open.start(),
        });
    }

    Ok(edits.apply())
}

/// Path of an asset as seen from an entry at `depth`.
pub fn asset_path(relative: &str, depth: usize) -> String {
    let back = "../".repeat(depth);
    format!("{}{}", back, path::join(&[ASSETS_ROOT, relative]))
}

fn is_relative(src: &str) -> bool {
    if src.starts_with('/') || src.starts_with('#') {
        return false;
    }

    // `scheme:` prefix, as in `https://…` or `data:…`
    match src.find(':') {
        Some(colon) => {
            let scheme = &src[..colon];
            scheme.is_empty()
                || !scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_zero_is_sibling_relative() {
        assert_eq!(
            rewrite_asset_paths(r#"<img src="a/b.png">"#, 0).unwrap(),
            r#"<img src="assets/a/b.png">"#
        );
    }

    #[test]
    fn test_depth_two() {
        assert_eq!(
            rewrite_asset_paths(r#"<img src="a/b.png">"#, 2).unwrap(),
            r#"<img src="../../assets/a/b.png">"#
        );
    }

    #[test]
    fn test_multiple_images_case_insensitive() {
        let html = r#"<p><IMG SRC="one.png"> and <img   src="two.jpg" alt="x"></p>"#;
        assert_eq!(
            rewrite_asset_paths(html, 1).unwrap(),
            r#"<p><IMG SRC="../assets/one.png"> and <img   src="../assets/two.jpg" alt="x"></p>"#
        );
    }

    #[test]
    fn test_rewritten_output_is_not_rematched() {
        let once = rewrite_asset_paths(r#"<img src="x.png"><img src="y.png">"#, 1).unwrap();
        assert_eq!(once, r#"<img src="../assets/x.png"><img src="../assets/y.png">"#);
    }

    #[test]
    fn test_absolute_and_remote_paths_untouched() {
        let html = r#"<img src="/logo.png"><img src="https://example.com/a.png"><img src="data:image/png;base64,AAAA">"#;
        assert_eq!(rewrite_asset_paths(html, 3).unwrap(), html);
    }

    #[test]
    fn test_duplicate_separators_collapsed() {
        assert_eq!(asset_path("icons//a.svg", 1), "../assets/icons/a.svg");
    }

    #[test]
    fn test_text_without_images() {
        let html = "<p>No pictures here</p>";
        assert_eq!(rewrite_asset_paths(html, 4).unwrap(), html);
    }

    #[test]
    fn test_unterminated_src_is_malformed() {
        let html = r#"<p>ok</p><img src="broken.png>"#;
        assert_eq!(
            rewrite_asset_paths(html, 1),
            Err(AssetError::MalformedMarkup { offset: 9 })
        );
    }

    #[test]
    fn test_empty_src_is_malformed() {
        assert!(matches!(
            rewrite_asset_paths(r#"<img src="">"#, 0),
            Err(AssetError::MalformedMarkup { offset: 0 })
        ));
    }
}
