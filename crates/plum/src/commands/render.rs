//! `render` command: render a single diagram source file.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};

use plum_config::{CliSettings, Config};
use plum_diagrams::{
    Align, DiagramKey, DiagramOptions, OutputFormat, extract_svg_style, html, latex,
};

use crate::commands::build_renderer;
use crate::error::CliError;
use crate::output::Output;

/// Markup flavor for `--emit`.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Emit {
    Html,
    Latex,
}

/// Arguments for the `render` command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Diagram source file, or '-' for stdin.
    input: PathBuf,

    /// Output format: png, svg, eps or pdf.
    #[arg(short, long, default_value = "png")]
    format: String,

    /// Config file (default: discover plum.toml upwards from the working directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image output directory (overrides config).
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Renderer command line (overrides config).
    #[arg(long)]
    plantuml: Option<String>,

    /// Emit embedding markup instead of the rendered file path.
    #[arg(long, value_enum)]
    emit: Option<Emit>,

    /// Caption for emitted markup.
    #[arg(long)]
    caption: Option<String>,

    /// Alt text for emitted markup.
    #[arg(long)]
    alt: Option<String>,

    /// Alignment for emitted markup: left, center or right.
    #[arg(long)]
    align: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self, out: &Output) -> Result<(), CliError> {
        let format = OutputFormat::parse(&self.format).ok_or_else(|| {
            CliError::Validation(format!(
                "invalid format '{}' (valid: png, svg, eps, pdf)",
                self.format
            ))
        })?;
        let align = self
            .align
            .as_deref()
            .map(|value| {
                Align::parse(value).ok_or_else(|| {
                    CliError::Validation(format!(
                        "invalid align '{value}' (valid: left, center, right)"
                    ))
                })
            })
            .transpose()?;

        let cli = CliSettings {
            command: self.plantuml.clone(),
            image_dir: self.image_dir.clone(),
            html_format: None,
        };
        let config = match &self.config {
            Some(path) => Config::load(path, &cli)?,
            None => Config::discover(Path::new("."), &cli)?,
        };

        let source = if self.input == Path::new("-") {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            std::fs::read_to_string(&self.input)?
        };

        let renderer = build_renderer(&config);
        tracing::info!("rendering {} as {}", self.input.display(), format.as_str());
        let path = renderer.render(&source, format)?;

        let options = DiagramOptions {
            caption: self.caption.clone(),
            alt: self.alt.clone(),
            align,
            format: Some(format),
        };

        match self.emit {
            None => out.result(&path.display().to_string()),
            Some(Emit::Latex) => {
                if format == OutputFormat::Svg {
                    return Err(CliError::Validation(
                        "--emit latex supports formats png, eps and pdf".to_owned(),
                    ));
                }
                let filename = DiagramKey {
                    source: &source,
                    format,
                }
                .filename();
                out.result(&latex::figure(&options, &filename));
            }
            Some(Emit::Html) => {
                let png_name = DiagramKey {
                    source: &source,
                    format: OutputFormat::Png,
                }
                .filename();
                let markup = match format {
                    OutputFormat::Png => {
                        html::figure(&options, &png_name, None, &config.output.url_prefix)
                    }
                    OutputFormat::Svg => {
                        renderer.render(&source, OutputFormat::Png)?;
                        let svg = html::SvgObject {
                            filename: DiagramKey {
                                source: &source,
                                format,
                            }
                            .filename(),
                            style: extract_svg_style(&path),
                        };
                        html::figure(&options, &png_name, Some(&svg), &config.output.url_prefix)
                    }
                    _ => {
                        return Err(CliError::Validation(
                            "--emit html supports formats png and svg".to_owned(),
                        ));
                    }
                };
                out.result(&markup);
            }
        }
        Ok(())
    }
}
