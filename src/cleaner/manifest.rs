use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::common::errors::{PackError, Result};

/// The ordered list of paths, relative to the root, that a run operates on.
///
/// Entries are kept exactly as they appear in the manifest file: no trimming,
/// no deduplication, and the empty entry produced by a trailing newline is
/// preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    /// Split manifest text on `\n` into entries
    pub fn parse(text: &str) -> Self {
        Self {
            entries: text.split('\n').map(str::to_owned).collect(),
        }
    }

    /// Build a manifest from already-split entries
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Read and parse the manifest at `root/relative`
    pub fn load(root: &Path, relative: &Path) -> Result<Self> {
        let path = root.join(relative);
        let text = std::fs::read_to_string(&path).map_err(|source| PackError::ManifestRead {
            path: path.clone(),
            source,
        })?;

        let manifest = Self::parse(&text);
        debug!(
            event = "manifest.loaded",
            path = %path.display(),
            entries = manifest.len(),
        );
        Ok(manifest)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    /// Entries that name something, in manifest order.
    /// Blank entries would resolve to the root itself, so they are never
    /// handed to an archiver.
    pub fn archivable(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(String::as_str)
            .filter(|entry| !entry.is_empty())
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        let manifest = Manifest::parse("b\na\nb");
        assert_eq!(manifest.entries(), ["b", "a", "b"]);
    }

    #[test]
    fn test_parse_keeps_trailing_blank() {
        let manifest = Manifest::parse("a.txt\n");
        assert_eq!(manifest.entries(), ["a.txt", ""]);
    }

    #[test]
    fn test_parse_does_not_normalize() {
        let manifest = Manifest::parse("dir/./x\r\n  spaced ");
        assert_eq!(manifest.entries(), ["dir/./x\r", "  spaced "]);
    }

    #[test]
    fn test_parse_empty_text_is_one_blank_entry() {
        let manifest = Manifest::parse("");
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.archivable().count(), 0);
    }

    #[test]
    fn test_archivable_skips_blank_entries() {
        let manifest = Manifest::from_entries(["a", "", "b", ""]);
        let inputs: Vec<&str> = manifest.archivable().collect();
        assert_eq!(inputs, ["a", "b"]);
    }

    #[test]
    fn test_load_reads_relative_to_root() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("external")).unwrap();
        std::fs::write(root.path().join("external/filelist.txt"), "x\ny\n").unwrap();

        let manifest = Manifest::load(root.path(), Path::new("external/filelist.txt")).unwrap();
        assert_eq!(manifest.entries(), ["x", "y", ""]);
    }

    #[test]
    fn test_load_missing_manifest_is_error() {
        let root = TempDir::new().unwrap();
        let err = Manifest::load(root.path(), Path::new("nope.txt")).unwrap_err();
        assert!(matches!(err, PackError::ManifestRead { .. }));
    }
}
