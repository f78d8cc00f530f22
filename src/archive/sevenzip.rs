use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::ArchiveBackend;
use crate::common::errors::{PackError, Result};

/// Runs an external 7-Zip compatible archiver:
/// `<program> a <output> -mx<level> <input...>` with the root as working directory.
///
/// Both stdout and stderr of the child go to our stdout, or to our stderr
/// when `forward_to_stderr` is set so stdout stays machine-readable.
#[derive(Debug, Clone)]
pub struct SevenZip {
    pub program: String,
    pub level: u8,
    pub forward_to_stderr: bool,
}

impl SevenZip {
    pub fn new(program: impl Into<String>, level: u8) -> Self {
        Self {
            program: program.into(),
            level,
            forward_to_stderr: false,
        }
    }

    /// Send the archiver's output to stderr instead of stdout
    pub fn with_output_to_stderr(mut self, enabled: bool) -> Self {
        self.forward_to_stderr = enabled;
        self
    }

    /// Build the command without running it
    pub fn command(&self, root: &Path, output: &Path, inputs: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("a")
            .arg(output)
            .arg(format!("-mx{}", self.level))
            .args(inputs)
            .current_dir(root);
        cmd
    }
}

impl Default for SevenZip {
    fn default() -> Self {
        Self::new("7z", 9)
    }
}

impl ArchiveBackend for SevenZip {
    fn name(&self) -> &'static str {
        "7z"
    }

    fn write(&self, root: &Path, output: &Path, inputs: &[&str]) -> Result<()> {
        let mut cmd = self.command(root, output, inputs);
        if self.forward_to_stderr {
            cmd.stdout(std::io::stderr()).stderr(std::io::stderr());
        } else {
            cmd.stdout(std::io::stdout()).stderr(std::io::stdout());
        }

        debug!(event = "archive.sevenzip.spawn", command = ?cmd);

        let status = cmd.status().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                PackError::ArchiverNotFound {
                    program: self.program.clone(),
                }
            } else {
                PackError::Io {
                    path: self.program.clone().into(),
                    source,
                }
            }
        })?;

        if !status.success() {
            return Err(PackError::ArchiverFailed {
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}
