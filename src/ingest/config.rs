use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    pub header_path: PathBuf,
    pub data_dir: PathBuf,
    pub snapshot_path: Option<PathBuf>,
}

impl IngestConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: IngestConfig = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
