use colored::*;
use std::io::Write;

use crate::archive::ArchiveReport;
use crate::cleaner::{CleanMode, CleanReport, CleanStatus, EntryOutcome};
use crate::common::format::{format_count, format_size, format_size_colored};

/// Print one status line for a cleaned entry.
/// A closed stdout is returned as an error instead of panicking.
pub fn print_status_line(outcome: &EntryOutcome) -> std::io::Result<()> {
    write_status_line(&mut std::io::stdout().lock(), outcome)
}

/// Write one colored status line to `out`
pub fn write_status_line<W: Write>(out: &mut W, outcome: &EntryOutcome) -> std::io::Result<()> {
    let tag = outcome.status.tag();
    let tag = match outcome.status {
        CleanStatus::NotExists => tag.dimmed(),
        CleanStatus::DeletedFile => tag.yellow(),
        CleanStatus::DeletedDirectory => tag.red(),
    };
    writeln!(out, "{} {}", tag, outcome.entry)
}

/// Print the summary that follows the status lines
pub fn print_clean_summary(report: &CleanReport) {
    println!();
    let mode_label = match report.mode {
        CleanMode::DryRun => "Dry run",
        CleanMode::Delete => "Deleted",
    };

    println!(
        "  {} {} — {}, {}, {}",
        "✓".green(),
        mode_label.bold(),
        format_count(report.files_deleted, "file", "files").cyan(),
        format_count(report.dirs_deleted, "directory", "directories").cyan(),
        format_size_colored(report.bytes_freed),
    );

    if report.missing > 0 {
        println!(
            "  {} {} not found",
            "→".dimmed(),
            format_count(report.missing, "entry", "entries").dimmed()
        );
    }

    if report.mode == CleanMode::DryRun {
        println!("  {} No files modified.", "ℹ️");
    }
}

/// Print the result of writing an archive
pub fn print_archive_report(report: &ArchiveReport) {
    println!();
    println!(
        "  {} Archived {} with {} → {} ({})",
        "📦",
        format_count(report.inputs, "entry", "entries"),
        report.backend.bold(),
        report.output.display().to_string().cyan(),
        format_size(report.size_bytes),
    );
}

/// Print a combined JSON report for an archive and/or clean run
pub fn print_json(
    archive: Option<&ArchiveReport>,
    clean: Option<&CleanReport>,
) -> anyhow::Result<()> {
    let json = serde_json::json!({
        "archive": archive,
        "clean": clean,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn outcome() -> EntryOutcome {
        EntryOutcome {
            entry: "a.txt".to_string(),
            status: CleanStatus::DeletedFile,
            size_bytes: 1,
        }
    }

    #[test]
    fn test_status_line_write_error_is_returned() {
        let err = write_status_line(&mut ClosedPipe, &outcome()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_status_line_plain_text() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_status_line(&mut out, &outcome()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[DELETE FILE] a.txt\n");
    }
}
