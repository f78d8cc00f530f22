use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Typed errors for manifest, archive and cleanup operations.
/// The binary reports these through `anyhow` at the top level,
/// but library callers can match on the exact failure.
#[derive(Debug, Error)]
pub enum PackError {
    /// Manifest file is missing or unreadable
    #[error("Failed to read manifest '{}': {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// External archiver could not be found on PATH
    #[error("Archiver '{program}' not found. Install it or pass --backend zip")]
    ArchiverNotFound { program: String },

    /// External archiver ran but exited unsuccessfully
    #[error("Archiver '{program}' failed: {status}")]
    ArchiverFailed { program: String, status: ExitStatus },

    /// An archive input named by the manifest does not exist
    #[error("Archive input does not exist: '{}'", path.display())]
    MissingInput { path: PathBuf },

    #[error("Zip archive error")]
    Zip(#[from] zip::result::ZipError),

    /// Deleting a manifest entry failed
    #[error("Failed to remove '{}': {source}", path.display())]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File system operation failed
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing a status line failed
    #[error("Failed to write status output")]
    Output(#[source] std::io::Error),
}

impl PackError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PackError::ManifestRead { .. } => "manifest.read_failed",
            PackError::ArchiverNotFound { .. } => "archive.tool_not_found",
            PackError::ArchiverFailed { .. } => "archive.tool_failed",
            PackError::MissingInput { .. } => "archive.missing_input",
            PackError::Zip(_) => "archive.zip_failed",
            PackError::Remove { .. } => "cleaner.remove_failed",
            PackError::Io { .. } => "io.failed",
            PackError::Output(_) => "output.write_failed",
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
