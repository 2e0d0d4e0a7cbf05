use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::store::transfer::ExportFormat;

pub const DEFAULT_DATA_FILE: &str = "user_data.json";

#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    pub version: u32,
    pub data: DataFile,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            data: DataFile::default(),
        }
    }
}

/// Where the CLI keeps the exported catalogue between runs
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DataFile {
    pub path: PathBuf,
    #[serde(default)]
    pub format: ExportFormat,
}

impl Default for DataFile {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_FILE),
            format: ExportFormat::default(),
        }
    }
}
