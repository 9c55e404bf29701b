//! Internal constants for diagram rendering.

/// Default executable for rendering diagrams.
pub const DEFAULT_PLANTUML: &str = "plantuml";

/// Default executable for EPS to PDF conversion.
pub const DEFAULT_EPSTOPDF: &str = "epstopdf";

/// Default charset passed to the renderer (`-charset`).
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Hex digits of the content hash used in cache filenames.
pub const FILENAME_HASH_LEN: usize = 12;
