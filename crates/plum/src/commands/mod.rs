//! CLI command implementations.

mod build;
mod render;

pub(crate) use build::BuildArgs;
pub(crate) use render::RenderArgs;

use plum_config::Config;
use plum_diagrams::{DiagramCache, DiagramRenderer, PlantUmlCommand};

/// Build the diagram renderer from resolved configuration.
pub(crate) fn build_renderer(config: &Config) -> DiagramRenderer {
    let command = PlantUmlCommand::default()
        .plantuml(config.renderer.command.to_argv())
        .epstopdf(config.renderer.epstopdf.to_argv())
        .charset(config.renderer.charset.clone());
    DiagramRenderer::new(command, DiagramCache::new(config.output.image_dir.clone()))
}
