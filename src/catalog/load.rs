//! JSON dump loading for the import tool.

use super::Song;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Reads a JSON array of songs. Field aliases from older dumps (`genre`,
/// `year`, `youtube_url`) are accepted.
pub fn load_songs<P: AsRef<Path>>(path: P) -> Result<Vec<Song>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read songs dump: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse songs dump: {:?}", path))
}

/// Reads a JSON object mapping user id to the list of that user's liked
/// titles.
pub fn load_likes<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, Vec<String>>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read likes dump: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse likes dump: {:?}", path))
}
