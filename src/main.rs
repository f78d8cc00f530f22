use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::IsTerminal;
use std::path::PathBuf;

use ignorepack::archive::{self, ArchiveBackend, SevenZip, ZipArchiver};
use ignorepack::cleaner::{self, CleanMode, CleanReport, Manifest};
use ignorepack::cli::args::{ArchiveBackendKind, Cli, Commands, ConfigAction, OutputFormat};
use ignorepack::cli::output;
use ignorepack::common::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("ignorepack=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        None => cmd_clean(&cli, false),

        Some(Commands::Clean { dry_run }) => cmd_clean(&cli, dry_run),

        Some(Commands::Archive {
            ref output,
            backend,
            ref program,
            level,
            clean,
        }) => cmd_archive(&cli, output.clone(), backend, program.clone(), level, clean),

        Some(Commands::Config { ref action }) => cmd_config(&cli, action),

        Some(Commands::Completions { ref shell }) => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                ignorepack::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                ignorepack::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                ignorepack::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "ignorepack", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Resolve the manifest location and load it
fn load_manifest(cli: &Cli, config: &Config) -> Result<Manifest> {
    let relative = cli.manifest.as_ref().unwrap_or(&config.manifest);
    let manifest = Manifest::load(&cli.root, relative)?;
    Ok(manifest)
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(cli: &Cli, dry_run: bool) -> Result<()> {
    let config = Config::load(&cli.root)?;
    let manifest = load_manifest(cli, &config)?;

    let mode = if dry_run {
        CleanMode::DryRun
    } else {
        CleanMode::Delete
    };

    let report = run_clean(cli, &manifest, mode)?;

    match cli.format {
        OutputFormat::Human => {
            if !cli.quiet {
                output::print_clean_summary(&report);
            }
        }
        OutputFormat::Json => output::print_json(None, Some(&report))?,
    }

    Ok(())
}

/// Clean the manifest, streaming status lines in human mode
fn run_clean(cli: &Cli, manifest: &Manifest, mode: CleanMode) -> Result<CleanReport> {
    let report = match cli.format {
        OutputFormat::Human => {
            cleaner::clean_with(&cli.root, manifest, mode, output::print_status_line)
        }
        OutputFormat::Json => cleaner::clean_with(&cli.root, manifest, mode, |_| Ok(())),
    };

    report.with_context(|| format!("Cleanup aborted under {}", cli.root.display()))
}

// ─── Archive ──────────────────────────────────────────────────────────────────

fn cmd_archive(
    cli: &Cli,
    archive_name: Option<PathBuf>,
    backend: ArchiveBackendKind,
    program: Option<String>,
    level: Option<u8>,
    clean: bool,
) -> Result<()> {
    let config = Config::load(&cli.root)?;
    let manifest = load_manifest(cli, &config)?;

    let archive_name = archive_name.unwrap_or_else(|| config.archive_name.clone());
    let level = level.unwrap_or(config.compression_level);

    let writer: Box<dyn ArchiveBackend> = match backend {
        ArchiveBackendKind::SevenZip => Box::new(
            SevenZip::new(program.unwrap_or_else(|| config.archiver.clone()), level)
                .with_output_to_stderr(matches!(cli.format, OutputFormat::Json)),
        ),
        ArchiveBackendKind::Zip => Box::new(ZipArchiver::new(level)),
    };

    let archive_report =
        archive::write_archive(writer.as_ref(), &cli.root, &manifest, &archive_name)
            .with_context(|| format!("Failed to write archive {}", archive_name.display()))?;

    if matches!(cli.format, OutputFormat::Human) && !cli.quiet {
        output::print_archive_report(&archive_report);
        if clean {
            println!();
        }
    }

    let clean_report = if clean {
        Some(run_clean(cli, &manifest, CleanMode::Delete)?)
    } else {
        None
    };

    match cli.format {
        OutputFormat::Human => {
            if let Some(ref report) = clean_report {
                if !cli.quiet {
                    output::print_clean_summary(report);
                }
            }
        }
        OutputFormat::Json => output::print_json(Some(&archive_report), clean_report.as_ref())?,
    }

    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(cli: &Cli, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load(&cli.root)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Init => {
            let path = Config::config_path(&cli.root);
            if path.exists() {
                anyhow::bail!("Config already exists: {}", path.display());
            }
            let path = Config::default().save(&cli.root)?;
            println!("  {} Wrote {}", "✓".green(), path.display());
            Ok(())
        }
    }
}
