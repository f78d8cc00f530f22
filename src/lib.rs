//! # ignorepack
//!
//! Archive and clean the files listed in a repository's ignored-files manifest.
//!
//! A manifest is a plain newline-separated list of paths relative to a root
//! directory. ignorepack can:
//!
//! - **Clean**: delete every listed file or directory, printing one
//!   `[DELETE FILE]`, `[DELETE DIRECTORY]` or `[NOT EXISTS]` line per entry
//! - **Archive**: pack every entry into a single archive with `7z -mx9`,
//!   or with the built-in zip writer
//!
//! The root is always passed explicitly; the process working directory is
//! never changed.

pub mod archive;
pub mod cleaner;
pub mod cli;
pub mod common;
