use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub top_n: Option<usize>,
    pub peer_count: Option<usize>,
    pub content_weight: Option<f32>,
    pub collab_weight: Option<f32>,
    pub cache_snapshots: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
