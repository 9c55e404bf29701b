//! Content-addressed diagram cache.
//!
//! Rendered diagrams are stored on disk keyed by a hash of their source and
//! output format. Entries are created if absent, never updated and never
//! evicted: the key is derived from the content, so a matching file is
//! always valid.

use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::consts::FILENAME_HASH_LEN;
use crate::format::OutputFormat;

/// Diagram parameters for cache key computation.
///
/// Contains the parameters that affect the rendered output. Identical source
/// and format always map to the same cache file.
#[derive(Debug)]
pub struct DiagramKey<'a> {
    /// Diagram source text.
    pub source: &'a str,
    /// Output format of the rendered artifact.
    pub format: OutputFormat,
}

impl DiagramKey<'_> {
    /// Compute a content hash for this diagram key.
    ///
    /// # Hash Format
    ///
    /// SHA-256 of `"{format}:{source}"`, hex encoded. Including the format
    /// ensures a PNG and an SVG of the same diagram get distinct files.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.format.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(self.source.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Cache filename for this key: `plantuml-{hash}.{ext}`.
    #[must_use]
    pub fn filename(&self) -> String {
        format!(
            "plantuml-{}.{}",
            &self.compute_hash()[..FILENAME_HASH_LEN],
            self.format.extension()
        )
    }
}

/// On-disk cache of rendered diagrams, rooted at a directory.
///
/// The root doubles as the image output directory of the build: markup
/// references the cached files directly, so a file written once serves
/// every later build that produces the same key.
#[derive(Debug)]
pub struct DiagramCache {
    root: PathBuf,
}

impl DiagramCache {
    /// Create a cache rooted at `root`. The directory is created lazily on
    /// first store.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the cache entry for `key`. The file may or may not exist.
    #[must_use]
    pub fn path_for(&self, key: &DiagramKey<'_>) -> PathBuf {
        self.root.join(key.filename())
    }

    /// Write rendered bytes to a cache path, creating the root if needed.
    pub fn store(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(source: &str, format: OutputFormat) -> String {
        DiagramKey { source, format }.compute_hash()
    }

    #[test]
    fn test_same_input_same_hash() {
        assert_eq!(
            key("Alice -> Bob", OutputFormat::Png),
            key("Alice -> Bob", OutputFormat::Png)
        );
    }

    #[test]
    fn test_distinct_sources_distinct_hashes() {
        assert_ne!(
            key("Alice -> Bob", OutputFormat::Png),
            key("Bob -> Alice", OutputFormat::Png)
        );
    }

    #[test]
    fn test_format_affects_hash() {
        assert_ne!(
            key("Alice -> Bob", OutputFormat::Png),
            key("Alice -> Bob", OutputFormat::Svg)
        );
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let hash = key("test source", OutputFormat::Png);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_filename_shape() {
        let name = DiagramKey {
            source: "Alice -> Bob",
            format: OutputFormat::Svg,
        }
        .filename();
        assert!(name.starts_with("plantuml-"));
        assert!(name.ends_with(".svg"));
        // "plantuml-" + 12 hex chars + ".svg"
        assert_eq!(name.len(), 9 + FILENAME_HASH_LEN + 4);
    }

    #[test]
    fn test_path_for_joins_root() {
        let cache = DiagramCache::new("/tmp/images");
        let diagram_key = DiagramKey {
            source: "Alice -> Bob",
            format: OutputFormat::Png,
        };
        let path = cache.path_for(&diagram_key);
        assert_eq!(path.parent(), Some(Path::new("/tmp/images")));
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(diagram_key.filename().as_str())
        );
    }

    #[test]
    fn test_store_creates_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cache = DiagramCache::new(tmp.path().join("nested/images"));
        let diagram_key = DiagramKey {
            source: "Alice -> Bob",
            format: OutputFormat::Png,
        };
        let path = cache.path_for(&diagram_key);

        cache.store(&path, b"png bytes").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"png bytes");
    }
}
