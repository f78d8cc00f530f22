use std::collections::HashSet;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ArchiveBackend;
use crate::common::errors::{PackError, Result};

/// In-process Deflate zip writer
#[derive(Debug, Clone)]
pub struct ZipArchiver {
    pub level: u8,
}

impl ZipArchiver {
    pub fn new(level: u8) -> Self {
        Self { level }
    }

    fn options(&self) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(self.level)))
    }
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self::new(9)
    }
}

impl ArchiveBackend for ZipArchiver {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn write(&self, root: &Path, output: &Path, inputs: &[&str]) -> Result<()> {
        // Fail before creating anything, like the external tool does
        for input in inputs {
            let path = root.join(input);
            if std::fs::symlink_metadata(&path).is_err() {
                return Err(PackError::MissingInput { path });
            }
        }

        let archive_path = root.join(output);
        let file = File::create(&archive_path).map_err(|source| PackError::Io {
            path: archive_path.clone(),
            source,
        })?;

        let result = self.write_entries(root, &archive_path, inputs, file);
        if result.is_err() {
            // Leave no half-written archive behind
            let _ = std::fs::remove_file(&archive_path);
        }
        result
    }
}

impl ZipArchiver {
    fn write_entries(
        &self,
        root: &Path,
        archive_path: &Path,
        inputs: &[&str],
        file: File,
    ) -> Result<()> {
        let mut writer = ZipWriter::new(file);
        let options = self.options();
        // Repeated or nested manifest entries reach the same names more than once
        let mut written: HashSet<String> = HashSet::new();

        for input in inputs {
            let base = root.join(input);
            for entry in WalkDir::new(&base).follow_links(false).sort_by_file_name() {
                let entry = entry.map_err(|e| PackError::Io {
                    path: base.clone(),
                    source: e.into(),
                })?;
                let path = entry.path();
                if path == archive_path {
                    continue;
                }

                let name = archive_name(root, path);
                if !written.insert(name.clone()) {
                    debug!(event = "archive.zip.duplicate_skipped", name = %name);
                    continue;
                }
                let file_type = entry.file_type();

                if file_type.is_dir() {
                    writer.add_directory(name, options)?;
                } else if file_type.is_file() {
                    debug!(event = "archive.zip.add_file", name = %name);
                    writer.start_file(name, options)?;
                    let mut source = File::open(path).map_err(|source| PackError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
                    std::io::copy(&mut source, &mut writer).map_err(|source| PackError::Io {
                        path: path.to_path_buf(),
                        source,
                    })?;
                } else {
                    warn!(
                        event = "archive.zip.skipped",
                        path = %path.display(),
                        "Skipping entry that is neither a file nor a directory"
                    );
                }
            }
        }

        writer.finish()?;
        Ok(())
    }
}

/// Name of a path inside the archive: relative to the root, `/`-separated
fn archive_name(root: &Path, path: &Path) -> String {
    let relative: PathBuf = path
        .strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();

    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
