//! Diagram block processor with deferred rendering.
//!
//! [`DiagramProcessor`] extracts `plantuml` blocks during document rendering
//! and replaces them with placeholders. Rendering happens in
//! [`post_process`](DiagramProcessor::post_process): each extracted diagram
//! is rendered cache-first, turned into backend markup, and substituted for
//! its placeholder in a single pass over the document. A diagram that fails
//! to render becomes an error figure and a warning; the build continues.

use std::collections::HashMap;

use crate::cache::DiagramKey;
use crate::directive::DiagramOptions;
use crate::format::{HtmlImageFormat, OutputFormat};
use crate::html::{self, SvgObject};
use crate::plantuml::{DiagramRenderer, RenderError};
use crate::svgstyle::extract_svg_style;

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the block with a placeholder for deferred rendering.
    Placeholder(String),
    /// Not a diagram block; render as a regular code block.
    PassThrough,
}

/// A diagram block extracted during rendering.
#[derive(Debug)]
pub struct ExtractedDiagram {
    /// Zero-based index of this block in the document.
    pub index: usize,
    /// Raw diagram source text.
    pub source: String,
    /// Parsed block options.
    pub options: DiagramOptions,
}

/// Code block processor for `PlantUML` diagrams.
///
/// # Example
///
/// ```ignore
/// let renderer = DiagramRenderer::new(PlantUmlCommand::default(), DiagramCache::new("out/_images"));
/// let mut processor = DiagramProcessor::new(renderer)
///     .html_format(HtmlImageFormat::Svg)
///     .url_prefix("_images/");
///
/// // feed code blocks through process() while rendering, then:
/// processor.post_process(&mut document_html);
/// ```
pub struct DiagramProcessor {
    renderer: DiagramRenderer,
    html_format: HtmlImageFormat,
    url_prefix: String,
    extracted: Vec<ExtractedDiagram>,
    warnings: Vec<String>,
}

impl DiagramProcessor {
    /// Create a processor rendering through `renderer`.
    #[must_use]
    pub fn new(renderer: DiagramRenderer) -> Self {
        Self {
            renderer,
            html_format: HtmlImageFormat::default(),
            url_prefix: String::new(),
            extracted: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Set the default HTML image format (per-block `format=` overrides it).
    #[must_use]
    pub fn html_format(mut self, format: HtmlImageFormat) -> Self {
        self.html_format = format;
        self
    }

    /// Set the prefix prepended to image references in markup
    /// (e.g. `"_images/"`).
    #[must_use]
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Process a code block.
    ///
    /// Diagram languages (`plantuml`, `uml`) are extracted and replaced with
    /// a `{{DIAGRAM_N}}` placeholder; anything else passes through.
    pub fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult {
        if !matches!(language, "plantuml" | "uml") {
            return ProcessResult::PassThrough;
        }

        let (options, warnings) = DiagramOptions::from_attrs(attrs, index);
        self.warnings.extend(warnings);
        self.extracted.push(ExtractedDiagram {
            index,
            source: source.to_owned(),
            options,
        });

        ProcessResult::Placeholder(format!("{{{{DIAGRAM_{index}}}}}"))
    }

    /// Render all extracted diagrams and replace their placeholders.
    pub fn post_process(&mut self, document: &mut String) {
        if self.extracted.is_empty() {
            return;
        }

        let mut replacements = Replacements::with_capacity(self.extracted.len());
        for diagram in &self.extracted {
            let mode = Self::html_mode(self.html_format, diagram, &mut self.warnings);
            match Self::render_figure(&self.renderer, mode, &self.url_prefix, diagram) {
                Ok(markup) => replacements.add(diagram.index, markup),
                Err(err) => {
                    tracing::warn!("diagram {} skipped: {err}", diagram.index);
                    self.warnings.push(format!("diagram {}: {err}", diagram.index));
                    replacements.add(diagram.index, html::error_figure(&err.to_string()));
                }
            }
        }
        replacements.apply(document);
    }

    /// All diagram blocks extracted so far.
    #[must_use]
    pub fn extracted(&self) -> &[ExtractedDiagram] {
        &self.extracted
    }

    /// Warnings accumulated during processing and rendering.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Resolve the HTML image mode for one block.
    ///
    /// A per-block `format=` option wins when it names an HTML format;
    /// EPS/PDF are LaTeX formats and fall back to the default with a warning.
    fn html_mode(
        default: HtmlImageFormat,
        diagram: &ExtractedDiagram,
        warnings: &mut Vec<String>,
    ) -> HtmlImageFormat {
        match diagram.options.format {
            None => default,
            Some(OutputFormat::Png) => HtmlImageFormat::Png,
            Some(OutputFormat::Svg) => HtmlImageFormat::Svg,
            Some(other) => {
                warnings.push(format!(
                    "diagram {}: format '{}' is not an HTML format, using {}",
                    diagram.index,
                    other.as_str(),
                    default.as_str()
                ));
                default
            }
        }
    }

    /// Render the artifacts one block needs and emit its figure markup.
    ///
    /// SVG mode renders both the SVG and the PNG fallback; the `<object>`
    /// element gets its `style` copied from the generated SVG root.
    fn render_figure(
        renderer: &DiagramRenderer,
        mode: HtmlImageFormat,
        prefix: &str,
        diagram: &ExtractedDiagram,
    ) -> Result<String, RenderError> {
        let png_name = DiagramKey {
            source: &diagram.source,
            format: OutputFormat::Png,
        }
        .filename();
        renderer.render(&diagram.source, OutputFormat::Png)?;

        match mode {
            HtmlImageFormat::Png => Ok(html::figure(&diagram.options, &png_name, None, prefix)),
            HtmlImageFormat::Svg => {
                let svg_path = renderer.render(&diagram.source, OutputFormat::Svg)?;
                let svg = SvgObject {
                    filename: DiagramKey {
                        source: &diagram.source,
                        format: OutputFormat::Svg,
                    }
                    .filename(),
                    style: extract_svg_style(&svg_path),
                };
                Ok(html::figure(&diagram.options, &png_name, Some(&svg), prefix))
            }
        }
    }
}

/// Collects placeholder replacements for single-pass application.
///
/// Replacing each placeholder with `String::replace` rescans the whole
/// document per diagram; this scans it once.
struct Replacements {
    map: HashMap<usize, String>,
}

const PLACEHOLDER_PREFIX: &str = "{{DIAGRAM_";

impl Replacements {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    fn add(&mut self, index: usize, markup: String) {
        self.map.insert(index, markup);
    }

    /// Substitute every known `{{DIAGRAM_N}}` placeholder in one pass.
    ///
    /// Unknown indices and malformed placeholders are left untouched.
    fn apply(self, document: &mut String) {
        if self.map.is_empty() {
            return;
        }

        let mut result = String::with_capacity(document.len());
        let mut rest = document.as_str();

        while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
            result.push_str(&rest[..start]);
            let after_prefix = &rest[start + PLACEHOLDER_PREFIX.len()..];

            let Some(end) = after_prefix.find("}}") else {
                // Unterminated placeholder; keep the tail as-is
                result.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let replaced = after_prefix[..end]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.map.get(&index));
            match replaced {
                Some(markup) => result.push_str(markup),
                None => result.push_str(&rest[start..start + PLACEHOLDER_PREFIX.len() + end + 2]),
            }
            rest = &after_prefix[end + 2..];
        }

        result.push_str(rest);
        *document = result;
    }
}
