//! Output format definitions for rendered diagrams.
//!
//! `PlantUML` selects its output format with a command-line flag in `-pipe`
//! mode. PDF has no pipe flag; it is derived from EPS via `epstopdf`.

/// Image formats the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Raster image (`PlantUML` default, no flag).
    #[default]
    Png,
    /// Vector image (`-tsvg`).
    Svg,
    /// Encapsulated PostScript (`-teps`).
    Eps,
    /// PDF, converted from EPS with `epstopdf`.
    Pdf,
}

impl OutputFormat {
    /// Parse format from an option value.
    ///
    /// Returns None if the value is not a supported format.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            "eps" => Some(Self::Eps),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Return format as string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Eps => "eps",
            Self::Pdf => "pdf",
        }
    }

    /// File extension for cache filenames.
    #[must_use]
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Command-line flag selecting this format in `-pipe` mode.
    ///
    /// PNG is the `PlantUML` default and needs no flag. PDF is never passed
    /// to `PlantUML` directly; [`DiagramRenderer::render`] renders EPS first
    /// and converts it.
    ///
    /// [`DiagramRenderer::render`]: crate::DiagramRenderer::render
    #[must_use]
    pub fn pipe_flag(self) -> Option<&'static str> {
        match self {
            Self::Png | Self::Pdf => None,
            Self::Svg => Some("-tsvg"),
            Self::Eps => Some("-teps"),
        }
    }
}

/// Image format for HTML output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlImageFormat {
    /// Plain `<img>` referencing a PNG (default).
    #[default]
    Png,
    /// `<object>` referencing an SVG, wrapping an `<img>` PNG fallback.
    Svg,
}

impl HtmlImageFormat {
    /// Parse format from a configuration or option value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Return format as string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Image format for LaTeX output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatexImageFormat {
    /// Raster image (default).
    #[default]
    Png,
    /// Encapsulated PostScript.
    Eps,
    /// PDF converted from EPS.
    Pdf,
}

impl LatexImageFormat {
    /// Parse format from a configuration or option value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "eps" => Some(Self::Eps),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// The renderer format producing the file `\includegraphics` references.
    #[must_use]
    pub fn output_format(self) -> OutputFormat {
        match self {
            Self::Png => OutputFormat::Png,
            Self::Eps => OutputFormat::Eps,
            Self::Pdf => OutputFormat::Pdf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("svg"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::parse("eps"), Some(OutputFormat::Eps));
        assert_eq!(OutputFormat::parse("pdf"), Some(OutputFormat::Pdf));
        assert_eq!(OutputFormat::parse("jpeg"), None);
        assert_eq!(OutputFormat::parse(""), None);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
    }

    #[test]
    fn test_pipe_flags() {
        assert_eq!(OutputFormat::Png.pipe_flag(), None);
        assert_eq!(OutputFormat::Svg.pipe_flag(), Some("-tsvg"));
        assert_eq!(OutputFormat::Eps.pipe_flag(), Some("-teps"));
        // PDF is derived from EPS, never passed to the renderer
        assert_eq!(OutputFormat::Pdf.pipe_flag(), None);
    }

    #[test]
    fn test_extension_matches_name() {
        for format in [
            OutputFormat::Png,
            OutputFormat::Svg,
            OutputFormat::Eps,
            OutputFormat::Pdf,
        ] {
            assert_eq!(format.extension(), format.as_str());
        }
    }

    #[test]
    fn test_html_image_format_parse() {
        assert_eq!(HtmlImageFormat::parse("png"), Some(HtmlImageFormat::Png));
        assert_eq!(HtmlImageFormat::parse("svg"), Some(HtmlImageFormat::Svg));
        assert_eq!(HtmlImageFormat::parse("eps"), None);
    }

    #[test]
    fn test_latex_image_format_output() {
        assert_eq!(LatexImageFormat::Png.output_format(), OutputFormat::Png);
        assert_eq!(LatexImageFormat::Eps.output_format(), OutputFormat::Eps);
        assert_eq!(LatexImageFormat::Pdf.output_format(), OutputFormat::Pdf);
    }

    #[test]
    fn test_latex_image_format_parse() {
        assert_eq!(LatexImageFormat::parse("pdf"), Some(LatexImageFormat::Pdf));
        assert_eq!(LatexImageFormat::parse("svg"), None);
    }
}
