//! Test fixture creation for the library database
//!
//! The engine only reads through `LibraryStore`, so tests seed the SQLite
//! file with direct SQL inserts against the created schema.

use super::constants::*;
use anyhow::Result;
use rusqlite::{params, Connection};
use serenata_server::store::SqliteLibraryStore;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary library with 5 songs and 4 users.
/// Returns (temp_dir, db_path).
///
/// The corpus is chosen so that scoring outcomes are predictable:
/// "Blue Night" and "Silver Moon" share their full lyric vocabulary, the
/// same genre and the same artist, so either one is the runaway content
/// match for a user who liked the other.
pub fn create_test_library() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("library.db");

    // Opening the store once creates the schema
    let _store = SqliteLibraryStore::new(&db_path)?;

    let conn = Connection::open(&db_path)?;

    // (title, artist, lyrics JSON, genres JSON, year, duration, media_url)
    let songs: &[(
        &str,
        &str,
        &str,
        &str,
        Option<&str>,
        Option<&str>,
        Option<&str>,
    )] = &[
        (
            SONG_BLUE_NIGHT,
            ARTIST_MIST_VALLEY,
            r#""blue night silver moon river""#,
            r#"["pop"]"#,
            Some("2019"),
            Some("3:10"),
            Some("https://media.example.com/blue-night"),
        ),
        (
            SONG_SILVER_MOON,
            ARTIST_MIST_VALLEY,
            r#""silver moon blue river night""#,
            r#"["pop"]"#,
            Some("2020"),
            None,
            None,
        ),
        (
            SONG_STONE_GARDEN,
            ARTIST_GRANITE_ARC,
            r#""stone garden heavy thunder""#,
            r#"["rock"]"#,
            Some("2015"),
            Some("4:02"),
            None,
        ),
        // Lyrics stored as a line list, the other JSON shape the loader accepts
        (
            SONG_PAPER_BOATS,
            ARTIST_QUIET_TIDE,
            r#"["paper boats drift", "river water"]"#,
            r#"["indie"]"#,
            Some("2021"),
            None,
            None,
        ),
        (
            SONG_EMBER_SKY,
            ARTIST_GRANITE_ARC,
            r#""ember sky thunder fire stone""#,
            r#"["rock"]"#,
            Some("2016"),
            None,
            None,
        ),
    ];

    for (title, artist, lyrics, genres, year, duration, media_url) in songs {
        conn.execute(
            "INSERT INTO song (title, artist, lyrics, genres, release_year, duration, media_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![title, artist, lyrics, genres, year, duration, media_url],
        )?;
    }

    // Registration order fixes the interaction-matrix row order
    for user in [USER_MINA, USER_JUN, USER_SOL, USER_NO_LIKES] {
        conn.execute("INSERT INTO app_user (user_id) VALUES (?1)", params![user])?;
    }

    let likes: &[(&str, &str)] = &[
        (USER_MINA, SONG_BLUE_NIGHT),
        (USER_JUN, SONG_BLUE_NIGHT),
        (USER_JUN, SONG_STONE_GARDEN),
        (USER_SOL, SONG_PAPER_BOATS),
        (USER_SOL, SONG_BLUE_NIGHT),
    ];
    for (user, title) in likes {
        conn.execute(
            "INSERT INTO liked_song (user_id, title) VALUES (?1, ?2)",
            params![user, title],
        )?;
    }

    Ok((dir, db_path))
}
