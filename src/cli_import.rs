//! Library Import Tool
//!
//! This binary imports a JSON song dump (and optionally a JSON likes dump)
//! into a SQLite library database.

use anyhow::Result;
use clap::Parser;
use serenata_server::catalog::{load_likes, load_songs};
use serenata_server::store::{LibraryStoreWriter, SqliteLibraryStore};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cli-import")]
#[command(about = "Import a JSON song dump into a SQLite library database")]
struct Args {
    /// Path to the JSON file holding an array of song objects
    #[arg(value_name = "SONGS_JSON")]
    songs_path: PathBuf,

    /// Path to the output SQLite database file
    #[arg(value_name = "OUTPUT_DB")]
    output_db: PathBuf,

    /// Path to a JSON object mapping user id to liked song titles
    #[arg(long)]
    likes: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Library Import Tool");
    info!("===================");
    info!("Songs dump: {}", args.songs_path.display());
    info!("Output database: {}", args.output_db.display());

    if args.output_db.exists() {
        warn!(
            "Output database already exists: {}",
            args.output_db.display()
        );
        warn!("Imported rows will be appended to its current contents.");
    }

    info!("Loading songs dump...");
    let songs = load_songs(&args.songs_path)?;
    info!("Loaded {} songs", songs.len());

    let store = SqliteLibraryStore::new(&args.output_db)?;

    let mut songs_imported = 0usize;
    let mut blank_titles = 0usize;
    for song in &songs {
        store.insert_song(song)?;
        songs_imported += 1;
        if !song.has_title() {
            blank_titles += 1;
        }
    }

    let mut users_imported = 0usize;
    let mut likes_imported = 0usize;
    if let Some(likes_path) = &args.likes {
        info!("Loading likes dump: {}", likes_path.display());
        let likes = load_likes(likes_path)?;
        for (user_id, titles) in &likes {
            store.register_user(user_id)?;
            users_imported += 1;
            for title in titles {
                store.set_liked(user_id, title)?;
                likes_imported += 1;
            }
        }
    }

    info!("");
    info!("Import Summary");
    info!("==============");
    info!("Songs imported: {}", songs_imported);
    if blank_titles > 0 {
        warn!(
            "{} songs have a blank title and will be ignored by ranking",
            blank_titles
        );
    }
    info!("Users imported: {}", users_imported);
    info!("Likes imported: {}", likes_imported);

    Ok(())
}
