use serde::Serialize;
use std::fs::Metadata;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::manifest::Manifest;
use crate::common::errors::{PackError, Result};

/// Clean mode determines whether entries are actually removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanMode {
    /// Classify every entry without touching the filesystem
    DryRun,
    /// Permanent removal
    Delete,
}

impl std::fmt::Display for CleanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanMode::DryRun => write!(f, "dry_run"),
            CleanMode::Delete => write!(f, "delete"),
        }
    }
}

/// What happened to a single manifest entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanStatus {
    NotExists,
    DeletedFile,
    DeletedDirectory,
}

impl CleanStatus {
    /// Console tag printed in front of the entry
    pub fn tag(&self) -> &'static str {
        match self {
            CleanStatus::NotExists => "[NOT EXISTS]",
            CleanStatus::DeletedFile => "[DELETE FILE]",
            CleanStatus::DeletedDirectory => "[DELETE DIRECTORY]",
        }
    }
}

/// Outcome for one manifest entry, in manifest order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    /// The entry exactly as written in the manifest
    pub entry: String,
    pub status: CleanStatus,
    /// Bytes held by the entry before removal (0 when missing)
    pub size_bytes: u64,
}

impl std::fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.tag(), self.entry)
    }
}

/// Report from a clean operation
#[derive(Debug, Clone, Serialize)]
pub struct CleanReport {
    pub mode: CleanMode,
    pub entries: Vec<EntryOutcome>,
    pub files_deleted: usize,
    pub dirs_deleted: usize,
    pub missing: usize,
    pub bytes_freed: u64,
}

impl CleanReport {
    fn new(mode: CleanMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
            files_deleted: 0,
            dirs_deleted: 0,
            missing: 0,
            bytes_freed: 0,
        }
    }

    fn record(&mut self, outcome: EntryOutcome) {
        match outcome.status {
            CleanStatus::NotExists => self.missing += 1,
            CleanStatus::DeletedFile => self.files_deleted += 1,
            CleanStatus::DeletedDirectory => self.dirs_deleted += 1,
        }
        self.bytes_freed += outcome.size_bytes;
        self.entries.push(outcome);
    }
}

/// Clean every manifest entry, writing one `"<tag> <entry>"` line per entry to `out`
pub fn clean<W: Write>(
    root: &Path,
    manifest: &Manifest,
    mode: CleanMode,
    out: &mut W,
) -> Result<CleanReport> {
    clean_with(root, manifest, mode, |outcome| writeln!(out, "{}", outcome))
}

/// Clean every manifest entry, handing each outcome to `emit` as soon as it is known.
///
/// Entries are processed strictly in order. A missing path is reported and
/// skipped; any error while removing an entry stops the run immediately,
/// leaving later entries untouched.
pub fn clean_with<F>(
    root: &Path,
    manifest: &Manifest,
    mode: CleanMode,
    mut emit: F,
) -> Result<CleanReport>
where
    F: FnMut(&EntryOutcome) -> std::io::Result<()>,
{
    let mut report = CleanReport::new(mode);

    for entry in manifest {
        let outcome = clean_entry(root, entry, mode)?;
        emit(&outcome).map_err(PackError::Output)?;
        report.record(outcome);
    }

    info!(
        event = "cleaner.finished",
        mode = %mode,
        files = report.files_deleted,
        directories = report.dirs_deleted,
        missing = report.missing,
        bytes = report.bytes_freed,
    );
    Ok(report)
}

fn clean_entry(root: &Path, entry: &str, mode: CleanMode) -> Result<EntryOutcome> {
    let Some((path, meta)) = resolve(root, entry) else {
        debug!(event = "cleaner.entry_missing", entry = entry);
        return Ok(EntryOutcome {
            entry: entry.to_string(),
            status: CleanStatus::NotExists,
            size_bytes: 0,
        });
    };

    // Symlinks are removed as links, never followed into their target
    let is_dir = meta.is_dir();
    let size_bytes = if is_dir { dir_size(&path) } else { meta.len() };

    if mode == CleanMode::Delete {
        remove_path(&path, is_dir)?;
        debug!(
            event = "cleaner.entry_deleted",
            path = %path.display(),
            directory = is_dir,
            bytes = size_bytes,
        );
    }

    Ok(EntryOutcome {
        entry: entry.to_string(),
        status: if is_dir {
            CleanStatus::DeletedDirectory
        } else {
            CleanStatus::DeletedFile
        },
        size_bytes,
    })
}

/// Resolve an entry against the root, returning `None` if nothing is there.
/// A blank entry never resolves, since joining it would name the root itself.
fn resolve(root: &Path, entry: &str) -> Option<(PathBuf, Metadata)> {
    if entry.is_empty() {
        return None;
    }
    let path = root.join(entry);
    let meta = std::fs::symlink_metadata(&path).ok()?;
    Some((path, meta))
}

/// Delete a single file or directory permanently
fn remove_path(path: &Path, is_dir: bool) -> Result<()> {
    let result = if is_dir {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    result.map_err(|source| PackError::Remove {
        path: path.to_path_buf(),
        source,
    })
}

/// Total size of the regular files under a directory
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(root: &Path, manifest: &Manifest, mode: CleanMode) -> (CleanReport, String) {
        let mut out = Vec::new();
        let report = clean(root, manifest, mode, &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_status_tags() {
        assert_eq!(CleanStatus::NotExists.tag(), "[NOT EXISTS]");
        assert_eq!(CleanStatus::DeletedFile.tag(), "[DELETE FILE]");
        assert_eq!(CleanStatus::DeletedDirectory.tag(), "[DELETE DIRECTORY]");
    }

    #[test]
    fn test_outcome_line_uses_entry_verbatim() {
        let outcome = EntryOutcome {
            entry: "sub/a.txt".to_string(),
            status: CleanStatus::DeletedFile,
            size_bytes: 3,
        };
        assert_eq!(outcome.to_string(), "[DELETE FILE] sub/a.txt");
    }

    #[test]
    fn test_blank_entry_never_touches_root() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("keep.txt"), "keep").unwrap();

        let (report, out) = run(root.path(), &Manifest::from_entries([""]), CleanMode::Delete);

        assert_eq!(out, "[NOT EXISTS] \n");
        assert_eq!(report.missing, 1);
        assert!(root.path().join("keep.txt").exists());
    }

    #[test]
    fn test_dry_run_keeps_files() {
        let root = TempDir::new().unwrap();
        std::fs::write(root.path().join("a.txt"), "hello").unwrap();
        std::fs::create_dir_all(root.path().join("d/e")).unwrap();
        std::fs::write(root.path().join("d/e/f.bin"), [0u8; 10]).unwrap();

        let manifest = Manifest::from_entries(["a.txt", "d"]);
        let (report, out) = run(root.path(), &manifest, CleanMode::DryRun);

        assert_eq!(out, "[DELETE FILE] a.txt\n[DELETE DIRECTORY] d\n");
        assert_eq!(report.bytes_freed, 15);
        assert!(root.path().join("a.txt").exists());
        assert!(root.path().join("d/e/f.bin").exists());
    }

    #[test]
    fn test_dir_size_counts_nested_files() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("x/y")).unwrap();
        std::fs::write(root.path().join("x/one"), [1u8; 4]).unwrap();
        std::fs::write(root.path().join("x/y/two"), [2u8; 6]).unwrap();

        assert_eq!(dir_size(&root.path().join("x")), 10);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_removed_without_following() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("target_dir")).unwrap();
        std::fs::write(root.path().join("target_dir/inner.txt"), "x").unwrap();
        std::os::unix::fs::symlink(root.path().join("target_dir"), root.path().join("link"))
            .unwrap();

        let (_, out) = run(root.path(), &Manifest::from_entries(["link"]), CleanMode::Delete);

        assert_eq!(out, "[DELETE FILE] link\n");
        assert!(std::fs::symlink_metadata(root.path().join("link")).is_err());
        assert!(root.path().join("target_dir/inner.txt").exists());
    }

    #[test]
    fn test_emit_failure_is_output_error() {
        let root = TempDir::new().unwrap();
        let err = clean_with(
            root.path(),
            &Manifest::from_entries(["missing"]),
            CleanMode::Delete,
            |_| Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe)),
        )
        .unwrap_err();
        assert!(matches!(err, PackError::Output(_)));
    }
}
