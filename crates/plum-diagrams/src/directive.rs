//! Diagram block options.
//!
//! A diagram block carries its options on the fence info line:
//!
//! ```text
//! plantuml format=svg align=center caption="Login flow"
//! ```
//!
//! Quoted values (single or double) may contain spaces; unquoted values end
//! at whitespace. Unknown keys and invalid values produce warnings and fall
//! back to defaults rather than failing the build.

use std::collections::HashMap;

use crate::format::OutputFormat;

/// Horizontal alignment of a rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    /// Parse alignment from an option value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Return alignment as string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// LaTeX environment wrapping an aligned graphic.
    #[must_use]
    pub fn latex_environment(self) -> &'static str {
        match self {
            Self::Left => "flushleft",
            Self::Center => "center",
            Self::Right => "flushright",
        }
    }
}

/// Options recognized on a diagram block.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DiagramOptions {
    /// Caption rendered below the diagram.
    pub caption: Option<String>,
    /// Alt text for the raster image.
    pub alt: Option<String>,
    /// Horizontal alignment.
    pub align: Option<Align>,
    /// Output format override for this block.
    pub format: Option<OutputFormat>,
}

impl DiagramOptions {
    /// Build options from parsed fence attributes.
    ///
    /// Invalid values for `format` and `align` fall back to unset, unknown
    /// keys are ignored; both cases are reported as warnings so the build
    /// never aborts on a malformed block.
    #[must_use]
    pub fn from_attrs(attrs: &HashMap<String, String>, index: usize) -> (Self, Vec<String>) {
        let mut options = Self::default();
        let mut warnings = Vec::new();

        for (key, value) in attrs {
            match key.as_str() {
                "caption" => options.caption = Some(value.clone()),
                "alt" => options.alt = Some(value.clone()),
                "align" => {
                    options.align = Align::parse(value);
                    if options.align.is_none() {
                        warnings.push(format!(
                            "diagram {index}: unknown align value '{value}' ignored (valid: left, center, right)"
                        ));
                    }
                }
                "format" => {
                    options.format = OutputFormat::parse(value);
                    if options.format.is_none() {
                        warnings.push(format!(
                            "diagram {index}: unknown format value '{value}' ignored (valid: png, svg, eps, pdf)"
                        ));
                    }
                }
                _ => {
                    warnings.push(format!(
                        "diagram {index}: unknown option '{key}' ignored (valid: caption, alt, align, format)"
                    ));
                }
            }
        }

        (options, warnings)
    }
}

/// Parse a fence info string into language and attributes.
///
/// Format: `language [key="value" ...]`. Values may be double-quoted,
/// single-quoted or bare; quoted values keep embedded whitespace.
#[must_use]
pub fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let info = info.trim();
    let (language, mut remaining) = match info.find(char::is_whitespace) {
        Some(end) => (&info[..end], &info[end..]),
        None => (info, ""),
    };

    let mut attrs = HashMap::new();
    loop {
        remaining = remaining.trim_start();
        if remaining.is_empty() {
            break;
        }
        if let Some((key, value, rest)) = parse_key_value(remaining) {
            attrs.insert(key.to_owned(), value.to_owned());
            remaining = rest;
        } else {
            // Bare word without '=': skip it
            let end = remaining
                .find(char::is_whitespace)
                .unwrap_or(remaining.len());
            remaining = &remaining[end..];
        }
    }

    (language.to_owned(), attrs)
}

/// Parse one key-value pair from the attributes string.
///
/// Supports `key="value"`, `key='value'` and `key=value`.
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];
    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}
