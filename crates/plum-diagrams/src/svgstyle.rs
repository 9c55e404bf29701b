//! `style` attribute extraction from generated SVG files.
//!
//! `PlantUML` writes its pixel dimensions into a `style="width:..;height:..;"`
//! attribute on the root `<svg>` element. When the SVG is embedded through an
//! HTML `<object>`, that style has to be copied onto the `<object>` element,
//! or the browser falls back to a default viewport size.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Attribute list of the root `<svg>` element.
static SVG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<svg\b([^<>]+)").unwrap());

/// `style` attribute, single- or double-quoted.
static STYLE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bstyle=['"]([^'"]*)['"]"#).unwrap());

/// Extract the `style` attribute value from the root element of an SVG file.
///
/// Returns an empty string when the file is unreadable, is not an SVG, or
/// carries no `style` attribute on its root element. This function never
/// fails: a missing style only costs the enclosing element its sizing.
#[must_use]
pub fn extract_svg_style(path: &Path) -> String {
    let Ok(bytes) = std::fs::read(path) else {
        tracing::debug!("could not read SVG {}", path.display());
        return String::new();
    };
    let text = String::from_utf8_lossy(&bytes);

    let Some(tag) = SVG_TAG_RE.captures(&text) else {
        return String::new();
    };
    STYLE_ATTR_RE
        .captures(&tag[1])
        .map(|m| m[1].to_owned())
        .unwrap_or_default()
}
