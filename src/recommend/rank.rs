//! Ranked rows returned by the recommendation operations.

use crate::catalog::Song;
use serde::{Deserialize, Serialize};

/// One row of a ranked recommendation list. Missing catalog metadata is
/// substituted on output so clients always see every field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedSong {
    pub title: String,
    pub artist: String,
    pub duration: String,
    pub media_link: String,
    pub score: f32,
}

impl RankedSong {
    pub fn from_song(song: &Song, score: f32) -> RankedSong {
        RankedSong {
            title: song.title.clone(),
            artist: song.artist.clone(),
            duration: song.duration.clone().unwrap_or_else(|| "--".to_string()),
            media_link: song.media_url.clone().unwrap_or_default(),
            score,
        }
    }

    /// Row for a liked title with no catalog entry (possible on the
    /// collaborative path, where candidates come from likes, not songs).
    pub fn from_title(title: &str, score: f32) -> RankedSong {
        RankedSong {
            title: title.to_string(),
            artist: "unknown".to_string(),
            duration: "--".to_string(),
            media_link: String::new(),
            score,
        }
    }
}

/// A [`RankedSong`] extended with the raw fusion components of the hybrid
/// score, so the weighting stays auditable from the outside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HybridScoredSong {
    pub title: String,
    pub artist: String,
    pub duration: String,
    pub media_link: String,
    pub score: f32,
    pub content_score: f32,
    pub peer_frequency: u32,
}
