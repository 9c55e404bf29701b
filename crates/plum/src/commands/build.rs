//! `build` command: render a markdown document with embedded diagrams.

use std::path::{Path, PathBuf};

use clap::Args;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use plum_config::{CliSettings, Config};
use plum_diagrams::{DiagramProcessor, HtmlImageFormat, ProcessResult, parse_fence_info};

use crate::commands::build_renderer;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the `build` command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown file to build.
    input: PathBuf,

    /// Output HTML file (default: input with .html extension).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: discover plum.toml upwards from the input).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image output directory (overrides config).
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// HTML image format: png or svg (overrides config).
    #[arg(long)]
    format: Option<String>,

    /// Renderer command line (overrides config).
    #[arg(long)]
    plantuml: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, out: &Output) -> Result<(), CliError> {
        let cli = CliSettings {
            command: self.plantuml.clone(),
            image_dir: self.image_dir.clone(),
            html_format: self.format.clone(),
        };
        let config = match &self.config {
            Some(path) => Config::load(path, &cli)?,
            None => {
                let start = self.input.parent().unwrap_or_else(|| Path::new("."));
                Config::discover(start, &cli)?
            }
        };

        let html_format = HtmlImageFormat::parse(&config.output.html_format).ok_or_else(|| {
            CliError::Validation(format!(
                "invalid html_format '{}' (valid: png, svg)",
                config.output.html_format
            ))
        })?;

        let markdown = std::fs::read_to_string(&self.input)?;
        let mut processor = DiagramProcessor::new(build_renderer(&config))
            .html_format(html_format)
            .url_prefix(config.output.url_prefix.clone());

        tracing::info!("building {}", self.input.display());
        let html = render_document(&markdown, &mut processor);

        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("html"));
        std::fs::write(&output_path, &html)?;

        for warning in processor.warnings() {
            out.warning(warning);
        }
        out.success(&format!(
            "Built {} ({} diagrams)",
            output_path.display(),
            processor.extracted().len()
        ));
        Ok(())
    }
}

/// A fenced code block being buffered while its events stream past.
struct Fence<'a> {
    info: CowStr<'a>,
    raw: Vec<Event<'a>>,
    source: String,
}

/// Render markdown to HTML, routing fenced code blocks through the diagram
/// processor.
///
/// Diagram blocks become placeholders that `post_process` swaps for figure
/// markup; everything else is passed to pulldown-cmark's HTML writer
/// untouched.
fn render_document(markdown: &str, processor: &mut DiagramProcessor) -> String {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
    );

    let mut events: Vec<Event> = Vec::new();
    let mut fence: Option<Fence> = None;
    let mut index = 0;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) if fence.is_none() => {
                fence = Some(Fence {
                    raw: vec![Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                        info.clone(),
                    )))],
                    info,
                    source: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => match fence.take() {
                Some(block) => {
                    let (language, attrs) = parse_fence_info(&block.info);
                    match processor.process(&language, &attrs, &block.source, index) {
                        ProcessResult::Placeholder(placeholder) => {
                            events.push(Event::Html(placeholder.into()));
                        }
                        ProcessResult::PassThrough => {
                            events.extend(block.raw);
                            events.push(Event::End(TagEnd::CodeBlock));
                        }
                    }
                    index += 1;
                }
                // Indented code block: not a fence, pass through
                None => events.push(Event::End(TagEnd::CodeBlock)),
            },
            Event::Text(text) => match fence.as_mut() {
                Some(block) => {
                    block.source.push_str(&text);
                    block.raw.push(Event::Text(text));
                }
                None => events.push(Event::Text(text)),
            },
            other => match fence.as_mut() {
                Some(block) => block.raw.push(other),
                None => events.push(other),
            },
        }
    }

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    processor.post_process(&mut html);
    html
}
