//! In-memory library store, the test double for everything engine-side.

use super::{LibraryStore, LibraryStoreWriter};
use crate::catalog::Song;
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryLibraryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    songs: Vec<Song>,
    user_order: Vec<String>,
    likes: HashMap<String, Vec<String>>,
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_songs(songs: Vec<Song>) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().songs = songs;
        store
    }
}

impl LibraryStore for MemoryLibraryStore {
    fn all_songs(&self) -> Result<Vec<Song>> {
        Ok(self.inner.lock().unwrap().songs.clone())
    }

    fn liked_titles(&self, user_id: &str) -> Result<Option<Vec<String>>> {
        let inner = self.inner.lock().unwrap();
        if !inner.user_order.iter().any(|u| u == user_id) {
            return Ok(None);
        }
        Ok(Some(
            inner.likes.get(user_id).cloned().unwrap_or_default(),
        ))
    }

    fn all_user_ids(&self) -> Result<Vec<String>> {
        Ok(self.inner.lock().unwrap().user_order.clone())
    }
}

impl LibraryStoreWriter for MemoryLibraryStore {
    fn insert_song(&self, song: &Song) -> Result<i64> {
        let mut inner = self.inner.lock().unwrap();
        inner.songs.push(song.clone());
        Ok(inner.songs.len() as i64)
    }

    fn register_user(&self, user_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.user_order.iter().any(|u| u == user_id) {
            inner.user_order.push(user_id.to_string());
        }
        Ok(())
    }

    fn set_liked(&self, user_id: &str, title: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.user_order.iter().any(|u| u == user_id) {
            inner.user_order.push(user_id.to_string());
        }
        let titles = inner.likes.entry(user_id.to_string()).or_default();
        if !titles.iter().any(|t| t == title) {
            titles.push(title.to_string());
        }
        Ok(())
    }

    fn songs_missing_media(&self) -> Result<Vec<(i64, Song)>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .songs
            .iter()
            .enumerate()
            .filter(|(_, song)| {
                song.duration.as_deref().unwrap_or("").is_empty()
                    || song.media_url.as_deref().unwrap_or("").is_empty()
            })
            .map(|(index, song)| (index as i64 + 1, song.clone()))
            .collect())
    }

    fn update_media(&self, song_id: i64, duration: &str, media_url: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let index = song_id as usize;
        if index == 0 || index > inner.songs.len() {
            bail!("No song with id {}", song_id);
        }
        let song = &mut inner.songs[index - 1];
        song.duration = Some(duration.to_string());
        song.media_url = Some(media_url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Lyrics;

    #[test]
    fn behaves_like_the_sqlite_store() {
        let store = MemoryLibraryStore::new();
        assert_eq!(store.liked_titles("ghost").unwrap(), None);

        store.register_user("fresh").unwrap();
        assert_eq!(store.liked_titles("fresh").unwrap(), Some(vec![]));

        store.set_liked("ada", "One").unwrap();
        store.set_liked("ada", "Two").unwrap();
        store.set_liked("ada", "One").unwrap();
        assert_eq!(
            store.liked_titles("ada").unwrap(),
            Some(vec!["One".to_string(), "Two".to_string()])
        );
        assert_eq!(store.all_user_ids().unwrap(), vec!["fresh", "ada"]);

        store
            .insert_song(&Song {
                title: "One".to_string(),
                artist: "Ada Band".to_string(),
                lyrics: Lyrics::Raw("la la".to_string()),
                genres: vec![],
                release_year: None,
                duration: None,
                media_url: None,
            })
            .unwrap();
        assert_eq!(store.songs_missing_media().unwrap().len(), 1);
        store.update_media(1, "1:23", "https://example.com").unwrap();
        assert!(store.songs_missing_media().unwrap().is_empty());
    }
}
