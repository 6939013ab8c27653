//! SQLite-backed library store implementation.

use super::schema::{BASE_DB_VERSION, LIBRARY_VERSIONED_SCHEMAS};
use super::{LibraryStore, LibraryStoreWriter};
use crate::catalog::Song;
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

const SONG_COLUMNS: &str = "title, artist, lyrics, genres, release_year, duration, media_url";

#[derive(Clone)]
pub struct SqliteLibraryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLibraryStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref();
        let conn = if db_path.exists() {
            Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .with_context(|| format!("Failed to open library database: {:?}", db_path))?
        } else {
            let conn = Connection::open(db_path)
                .with_context(|| format!("Failed to create library database: {:?}", db_path))?;
            LIBRARY_VERSIONED_SCHEMAS
                .last()
                .context("No library schema versions defined")?
                .create(&conn)?;
            conn
        };

        let db_version = conn
            .query_row("PRAGMA user_version;", [], |row| row.get::<usize, i64>(0))
            .context("Failed to read library database version")?
            - BASE_DB_VERSION as i64;
        if db_version < 0 {
            bail!("Library database predates version tracking, refusing to open");
        }
        if db_version as usize >= LIBRARY_VERSIONED_SCHEMAS.len() {
            bail!("Library database version {} is too new", db_version);
        }
        migrate_if_needed(&conn, db_version as usize)?;

        let store = SqliteLibraryStore {
            conn: Arc::new(Mutex::new(conn)),
        };
        let (songs, users) = store.counts()?;
        info!("Library store ready: {} songs, {} users", songs, users);
        Ok(store)
    }

    fn counts(&self) -> Result<(usize, usize)> {
        let conn = self.conn.lock().unwrap();
        let songs = conn.query_row("SELECT COUNT(*) FROM song", [], |r| r.get(0))?;
        let users = conn.query_row("SELECT COUNT(*) FROM app_user", [], |r| r.get(0))?;
        Ok((songs, users))
    }
}

fn migrate_if_needed(conn: &Connection, mut current_version: usize) -> Result<()> {
    for schema in LIBRARY_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
        if let Some(migration_fn) = schema.migration {
            info!(
                "Migrating library db from version {} to {}",
                current_version, schema.version
            );
            migration_fn(conn)?;
            current_version = schema.version;
        }
    }
    conn.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
    Ok(())
}

/// Raw row shape; lyrics and genres are stored as JSON text.
struct SongRow {
    title: String,
    artist: String,
    lyrics: String,
    genres: String,
    release_year: Option<String>,
    duration: Option<String>,
    media_url: Option<String>,
}

impl SongRow {
    fn from_row(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(SongRow {
            title: row.get(offset)?,
            artist: row.get(offset + 1)?,
            lyrics: row.get(offset + 2)?,
            genres: row.get(offset + 3)?,
            release_year: row.get(offset + 4)?,
            duration: row.get(offset + 5)?,
            media_url: row.get(offset + 6)?,
        })
    }

    fn into_song(self) -> Result<Song> {
        Ok(Song {
            title: self.title,
            artist: self.artist,
            lyrics: serde_json::from_str(&self.lyrics)
                .context("Malformed lyrics JSON in library row")?,
            genres: serde_json::from_str(&self.genres)
                .context("Malformed genres JSON in library row")?,
            release_year: self.release_year,
            duration: self.duration,
            media_url: self.media_url,
        })
    }
}

impl LibraryStore for SqliteLibraryStore {
    fn all_songs(&self) -> Result<Vec<Song>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM song ORDER BY id",
            SONG_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], |row| SongRow::from_row(row, 0))?
            .collect::<Result<Vec<SongRow>, _>>()?;
        rows.into_iter().map(SongRow::into_song).collect()
    }

    fn liked_titles(&self, user_id: &str) -> Result<Option<Vec<String>>> {
        let conn = self.conn.lock().unwrap();
        let known = conn
            .query_row(
                "SELECT 1 FROM app_user WHERE user_id = ?1",
                params![user_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !known {
            return Ok(None);
        }
        let mut stmt =
            conn.prepare("SELECT title FROM liked_song WHERE user_id = ?1 ORDER BY id")?;
        let titles = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(Some(titles))
    }

    fn all_user_ids(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT user_id FROM app_user ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

impl LibraryStoreWriter for SqliteLibraryStore {
    fn insert_song(&self, song: &Song) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!(
                "INSERT INTO song ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                SONG_COLUMNS
            ),
            params![
                song.title,
                song.artist,
                serde_json::to_string(&song.lyrics)?,
                serde_json::to_string(&song.genres)?,
                song.release_year,
                song.duration,
                song.media_url
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn register_user(&self, user_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO app_user (user_id) VALUES (?1)",
            params![user_id],
        )?;
        Ok(())
    }

    fn set_liked(&self, user_id: &str, title: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO app_user (user_id) VALUES (?1)",
            params![user_id],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO liked_song (user_id, title) VALUES (?1, ?2)",
            params![user_id, title],
        )?;
        Ok(())
    }

    fn songs_missing_media(&self) -> Result<Vec<(i64, Song)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT id, {} FROM song \
             WHERE duration IS NULL OR duration = '' \
                OR media_url IS NULL OR media_url = '' \
             ORDER BY id",
            SONG_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, SongRow::from_row(row, 1)?)))?
            .collect::<Result<Vec<(i64, SongRow)>, _>>()?;
        rows.into_iter()
            .map(|(id, row)| Ok((id, row.into_song()?)))
            .collect()
    }

    fn update_media(&self, song_id: i64, duration: &str, media_url: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE song SET duration = ?2, media_url = ?3 WHERE id = ?1",
            params![song_id, duration, media_url],
        )?;
        if updated == 0 {
            bail!("No song with id {}", song_id);
        }
        Ok(())
    }
}
