use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional config file, looked up at the working root
pub const CONFIG_FILE: &str = "ignorepack.toml";

/// Per-repository configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Manifest location, relative to the root
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Archive written by `ignorepack archive` when no output is given
    #[serde(default = "default_archive_name")]
    pub archive_name: PathBuf,

    /// External archiver executable
    #[serde(default = "default_archiver")]
    pub archiver: String,

    /// Compression level passed to the archiver (0-9)
    #[serde(default = "default_compression_level")]
    pub compression_level: u8,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("external/filelist.txt")
}
fn default_archive_name() -> PathBuf {
    PathBuf::from("external-ignored.7z")
}
fn default_archiver() -> String {
    "7z".to_string()
}
fn default_compression_level() -> u8 {
    9
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            archive_name: default_archive_name(),
            archiver: default_archiver(),
            compression_level: default_compression_level(),
        }
    }
}

impl Config {
    /// Get the config file path for a root
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load config from the root, or fall back to defaults if there is none
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        if config.compression_level > 9 {
            anyhow::bail!(
                "Invalid compression_level {} in {} (expected 0-9)",
                config.compression_level,
                path.display()
            );
        }

        Ok(config)
    }

    /// Save config to the root, returning the written path
    pub fn save(&self, root: &Path) -> Result<PathBuf> {
        let path = Self::config_path(root);
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(path)
    }
}
