//! HTML markup for rendered diagrams.
//!
//! PNG mode emits a plain `<img>`; SVG mode emits an `<object>` referencing
//! the vector image with the raster `<img>` as fallback content for browsers
//! that refuse the object. Both are wrapped in `<figure class="diagram">`.

use std::fmt::Write;

use crate::directive::DiagramOptions;
use crate::util::escape_html;

/// Reference to a rendered SVG for `<object>` embedding.
#[derive(Debug)]
pub struct SvgObject {
    /// Cache filename of the SVG.
    pub filename: String,
    /// `style` attribute extracted from the SVG root element.
    pub style: String,
}

/// Emit a diagram figure.
///
/// `png_filename` is always required; it is the `<img>` source in PNG mode
/// and the fallback in SVG mode. `prefix` is prepended to every file
/// reference (e.g. `"_images/"`).
#[must_use]
pub fn figure(
    options: &DiagramOptions,
    png_filename: &str,
    svg: Option<&SvgObject>,
    prefix: &str,
) -> String {
    let mut out = String::new();
    out.push_str("<figure class=\"diagram");
    if let Some(align) = options.align {
        write!(out, " align-{}", align.as_str()).unwrap();
    }
    out.push_str("\">");

    let img = img_tag(options, png_filename, prefix);
    match svg {
        Some(object) => {
            write!(
                out,
                r#"<object data="{}{}" type="image/svg+xml" style="{}">{img}</object>"#,
                escape_html(prefix),
                escape_html(&object.filename),
                escape_html(&object.style),
            )
            .unwrap();
        }
        None => out.push_str(&img),
    }

    if let Some(caption) = &options.caption {
        write!(out, "<figcaption>{}</figcaption>", escape_html(caption)).unwrap();
    }
    out.push_str("</figure>");
    out
}

/// Emit the error figure shown in place of a diagram that failed to render.
#[must_use]
pub fn error_figure(message: &str) -> String {
    format!(
        r#"<figure class="diagram diagram-error"><pre>Diagram rendering failed: {}</pre></figure>"#,
        escape_html(message)
    )
}

fn img_tag(options: &DiagramOptions, png_filename: &str, prefix: &str) -> String {
    let alt = options.alt.as_deref().unwrap_or("diagram");
    format!(
        r#"<img src="{}{}" alt="{}">"#,
        escape_html(prefix),
        escape_html(png_filename),
        escape_html(alt)
    )
}
