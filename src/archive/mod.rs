//! Archive writers: compress every manifest entry into a single file at the root.
//!
//! The default backend shells out to `7z`; the zip backend writes the archive
//! in-process for hosts that don't have an external archiver installed.

pub mod sevenzip;
pub mod zip_backend;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cleaner::Manifest;
use crate::common::errors::Result;

pub use sevenzip::SevenZip;
pub use zip_backend::ZipArchiver;

/// Something that can pack a list of root-relative inputs into one archive
pub trait ArchiveBackend {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Write `output` (relative to `root`) containing every input path
    fn write(&self, root: &Path, output: &Path, inputs: &[&str]) -> Result<()>;
}

/// Report from an archive operation
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub backend: String,
    pub output: PathBuf,
    pub inputs: usize,
    pub size_bytes: u64,
}

/// Archive every non-blank manifest entry into `output`
pub fn write_archive(
    backend: &dyn ArchiveBackend,
    root: &Path,
    manifest: &Manifest,
    output: &Path,
) -> Result<ArchiveReport> {
    let inputs: Vec<&str> = manifest.archivable().collect();

    info!(
        event = "archive.started",
        backend = backend.name(),
        output = %output.display(),
        inputs = inputs.len(),
    );

    backend.write(root, output, &inputs)?;

    let archive_path = root.join(output);
    let size_bytes = std::fs::metadata(&archive_path)
        .map(|m| m.len())
        .unwrap_or(0);

    info!(
        event = "archive.completed",
        backend = backend.name(),
        path = %archive_path.display(),
        bytes = size_bytes,
    );

    Ok(ArchiveReport {
        backend: backend.name().to_string(),
        output: archive_path,
        inputs: inputs.len(),
        size_bytes,
    })
}
