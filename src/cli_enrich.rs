//! Media Enrichment Tool
//!
//! This binary fills in missing durations and media links on library songs
//! by querying the iTunes Search API. Songs that already carry both fields
//! are left untouched.

use anyhow::Result;
use clap::Parser;
use serenata_server::enrichment::itunes::ITunesClient;
use serenata_server::store::{LibraryStoreWriter, SqliteLibraryStore};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cli-enrich")]
#[command(about = "Resolve missing media links and durations via iTunes search")]
struct Args {
    /// Path to the SQLite library database file
    #[arg(value_name = "LIBRARY_DB")]
    library_db: PathBuf,

    /// Look up songs and log what would change without writing anything
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Media Enrichment Tool");
    info!("=====================");
    info!("Library database: {}", args.library_db.display());
    if args.dry_run {
        info!("Dry run: no rows will be written");
    }

    let store = SqliteLibraryStore::new(&args.library_db)?;
    let client = ITunesClient::new()?;

    let pending = store.songs_missing_media()?;
    info!("{} songs are missing a duration or media link", pending.len());

    let mut hits = 0u32;
    let mut misses = 0u32;
    let mut errors = 0u32;

    for (song_id, song) in &pending {
        let term = format!("{} {}", song.artist, song.title);

        let resolved = match client.resolve(&term) {
            Ok(r) => r,
            Err(e) => {
                warn!("iTunes lookup failed for '{}': {}", term, e);
                errors += 1;
                continue;
            }
        };

        match resolved {
            Some(media) => {
                let duration = media.duration.as_deref().unwrap_or("--");
                debug!(
                    "Resolved '{}' to {} ({})",
                    term, media.media_url, duration
                );
                if !args.dry_run {
                    store.update_media(*song_id, duration, &media.media_url)?;
                }
                hits += 1;
            }
            None => {
                debug!("No match for '{}'", term);
                misses += 1;
            }
        }
    }

    info!("");
    info!("Enrichment Summary");
    info!("==================");
    info!("Resolved: {}", hits);
    info!("No match: {}", misses);
    if errors > 0 {
        warn!("Errors encountered: {}", errors);
    }

    Ok(())
}
