//! PlantUML diagram rendering for Plum.
//!
//! This crate renders embedded `PlantUML` diagram blocks to images for
//! documentation builds:
//! - `DiagramProcessor` extracts diagram blocks and replaces them with
//!   placeholders during rendering
//! - `DiagramRenderer` invokes the `plantuml` executable and stores output
//!   in a content-addressed cache (render once, reuse forever)
//! - Backend markup emission for HTML (`<img>`/`<object>` pair) and LaTeX
//!   (`\includegraphics`/figure blocks)
//! - SVG `style` attribute extraction for sizing embedded `<object>` elements
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`directive`]: Diagram block options (`DiagramOptions`, `Align`) and
//!   fence info parsing
//! - [`format`]: Output format definitions (`OutputFormat`, `HtmlImageFormat`,
//!   `LatexImageFormat`)
//! - [`cache`]: Content-addressed cache key and on-disk cache
//! - [`plantuml`]: Subprocess invocation of `plantuml` and `epstopdf`
//! - [`processor`]: `DiagramProcessor` with placeholder replacement
//! - [`html`] / [`latex`]: Backend markup emission
//! - [`svgstyle`]: `style` attribute extraction from generated SVG files
//!
//! # Example
//!
//! ```ignore
//! use plum_diagrams::{DiagramCache, DiagramProcessor, DiagramRenderer, PlantUmlCommand};
//!
//! let renderer = DiagramRenderer::new(
//!     PlantUmlCommand::default(),
//!     DiagramCache::new("out/_images"),
//! );
//! let mut processor = DiagramProcessor::new(renderer).url_prefix("_images/");
//!
//! // Host framework feeds code blocks through process(), then calls
//! // post_process() on the rendered document.
//! ```

mod cache;
mod consts;
mod directive;
mod format;
pub mod html;
pub mod latex;
mod plantuml;
mod processor;
mod svgstyle;
mod util;

pub use cache::{DiagramCache, DiagramKey};
pub use directive::{Align, DiagramOptions, parse_fence_info};
pub use format::{HtmlImageFormat, LatexImageFormat, OutputFormat};
pub use plantuml::{DiagramRenderer, PlantUmlCommand, RenderError};
pub use processor::{DiagramProcessor, ExtractedDiagram, ProcessResult};
pub use svgstyle::extract_svg_style;
pub use util::escape_html;
