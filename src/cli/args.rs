use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ignorepack — archive and clean the files listed in an ignored-files manifest
#[derive(Parser, Debug)]
#[command(
    name = "ignorepack",
    version,
    about = "Archive and clean the files listed in an ignored-files manifest",
    long_about = "ignorepack reads a newline-separated list of paths (external/filelist.txt\n\
                  by default), can pack them into one archive with 7z, and deletes them.\n\
                  Running it without a subcommand cleans.",
    after_help = "EXAMPLES:\n  \
        ignorepack                                 Delete every manifest entry\n  \
        ignorepack clean --dry-run                 Show what would be deleted\n  \
        ignorepack --root ../cocos2d-x clean       Clean another checkout\n  \
        ignorepack archive                         Pack entries with 7z -mx9\n  \
        ignorepack archive out.zip --backend zip   Pack without an external tool\n  \
        ignorepack archive --clean                 Pack, then delete the originals\n  \
        ignorepack config show                     Print the effective config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory every manifest entry is resolved against
    #[arg(
        long,
        global = true,
        env = "IGNOREPACK_ROOT",
        value_name = "DIR",
        default_value = "."
    )]
    pub root: PathBuf,

    /// Manifest path relative to the root (overrides the config file)
    #[arg(long, short, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — status lines only, no summary
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete every path listed in the manifest (the default)
    Clean {
        /// Report what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Pack every manifest entry into one archive at the root
    Archive {
        /// Archive file name, relative to the root
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Archive writer to use
        #[arg(long, default_value = "7z")]
        backend: ArchiveBackendKind,

        /// External archiver executable (7z backend only)
        #[arg(long, value_name = "BIN")]
        program: Option<String>,

        /// Compression level
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=9))]
        level: Option<u8>,

        /// Delete the manifest entries once the archive is written
        #[arg(long)]
        clean: bool,
    },

    /// Manage ignorepack.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a default ignorepack.toml at the root
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ArchiveBackendKind {
    /// External 7-Zip archiver
    #[value(name = "7z")]
    SevenZip,
    /// Built-in zip writer
    Zip,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
