//! LaTeX markup for rendered diagrams.
//!
//! The graphic itself is an `\includegraphics`. Alignment wraps it in the
//! matching `flushleft`/`center`/`flushright` environment, and a caption (or
//! any alignment) promotes the whole block to a `figure` environment. A block
//! with neither stays a bare `\includegraphics` so it can sit inline.

use std::fmt::Write;

use crate::directive::DiagramOptions;

/// Emit the LaTeX block embedding a rendered diagram file.
#[must_use]
pub fn figure(options: &DiagramOptions, filename: &str) -> String {
    let mut body = format!("\\includegraphics{{{filename}}}");

    if let Some(align) = options.align {
        let env = align.latex_environment();
        body = format!("\\begin{{{env}}}\n{body}\n\\end{{{env}}}");
    }

    if options.caption.is_none() && options.align.is_none() {
        return body;
    }

    let mut out = String::new();
    out.push_str("\\begin{figure}[htbp]\n");
    out.push_str(&body);
    out.push('\n');
    if let Some(caption) = &options.caption {
        writeln!(out, "\\caption{{{}}}", escape_latex(caption)).unwrap();
    }
    out.push_str("\\end{figure}\n");
    out
}

/// Escape LaTeX special characters in caption text.
#[must_use]
pub fn escape_latex(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\textbackslash{}"),
            '{' => result.push_str("\\{"),
            '}' => result.push_str("\\}"),
            '$' => result.push_str("\\$"),
            '&' => result.push_str("\\&"),
            '#' => result.push_str("\\#"),
            '%' => result.push_str("\\%"),
            '_' => result.push_str("\\_"),
            '^' => result.push_str("\\textasciicircum{}"),
            '~' => result.push_str("\\textasciitilde{}"),
            _ => result.push(c),
        }
    }
    result
}
