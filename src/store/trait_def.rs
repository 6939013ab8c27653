//! LibraryStore trait definitions.

use crate::catalog::Song;
use anyhow::Result;

/// Read access to the song library and the per-user liked lists.
///
/// Everything the scoring engine consumes comes through this trait, so tests
/// and alternative backends can swap in transparently.
pub trait LibraryStore: Send + Sync {
    // =========================================================================
    // Corpus
    // =========================================================================

    /// Returns every song in stable corpus order. Unique titles are NOT
    /// guaranteed; consumers tolerate duplicates.
    fn all_songs(&self) -> Result<Vec<Song>>;

    // =========================================================================
    // Users and likes
    // =========================================================================

    /// Returns the titles a user liked, in insertion order.
    /// Returns Ok(None) if the user is unknown.
    /// Returns Err if there is a database error.
    fn liked_titles(&self, user_id: &str) -> Result<Option<Vec<String>>>;

    /// Returns all known user ids in stable row order.
    fn all_user_ids(&self) -> Result<Vec<String>>;
}

/// Write access used by the import tool, the enrichment tool and test
/// fixtures.
pub trait LibraryStoreWriter: LibraryStore {
    /// Appends a song to the corpus and returns its row id.
    fn insert_song(&self, song: &Song) -> Result<i64>;

    /// Registers a user with an empty liked list. Idempotent.
    fn register_user(&self, user_id: &str) -> Result<()>;

    /// Records that a user liked a title, registering the user if needed.
    /// Liking the same title twice is a no-op.
    fn set_liked(&self, user_id: &str, title: &str) -> Result<()>;

    /// Returns `(row id, song)` for every song missing a duration or a media
    /// link.
    fn songs_missing_media(&self) -> Result<Vec<(i64, Song)>>;

    /// Fills duration and media url on one song row.
    fn update_media(&self, song_id: i64, duration: &str, media_url: &str) -> Result<()>;
}
