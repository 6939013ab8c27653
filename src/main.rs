use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use serenata_server::config::{AppConfig, CliConfig, FileConfig};
use serenata_server::recommend::{
    CachingSnapshotProvider, RebuildingSnapshotProvider, SnapshotProvider,
};
use serenata_server::server::run_server;
use serenata_server::store::{LibraryStore, SqliteLibraryStore};
use serenata_server::RequestsLoggingLevel;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite library database file.
    #[clap(value_parser = parse_path)]
    pub library_db: PathBuf,

    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// How many recommendations each ranking endpoint returns.
    #[clap(long, default_value_t = 10)]
    pub top_n: usize,

    /// How many nearest peers collaborative filtering considers.
    #[clap(long, default_value_t = 2)]
    pub peer_count: usize,

    /// Weight of the content score in hybrid ranking.
    #[clap(long, default_value_t = 0.8)]
    pub content_weight: f32,

    /// Weight of the peer-frequency score in hybrid ranking.
    #[clap(long, default_value_t = 0.2)]
    pub collab_weight: f32,

    /// Reuse the trained corpus snapshot across requests until the library
    /// changes.
    #[clap(long)]
    pub cache_snapshots: bool,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            db_path: args.library_db.clone(),
            port: args.port,
            logging_level: args.logging_level.clone(),
            top_n: args.top_n,
            peer_count: args.peer_count,
            content_weight: args.content_weight,
            collab_weight: args.collab_weight,
            cache_snapshots: args.cache_snapshots,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: CliConfig = (&cli_args).into();
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_path: {:?}", app_config.db_path);
    info!("  port: {}", app_config.port);
    info!("  top_n: {}", app_config.top_n);
    info!("  peer_count: {}", app_config.peer_count);

    info!(
        "Opening SQLite library database at {:?}...",
        app_config.db_path
    );
    let store: Arc<dyn LibraryStore> = Arc::new(SqliteLibraryStore::new(&app_config.db_path)?);

    let song_count = store.all_songs()?.len();
    let user_count = store.all_user_ids()?.len();
    info!("Library holds {} songs and {} users", song_count, user_count);

    let snapshots: Arc<dyn SnapshotProvider> = if app_config.cache_snapshots {
        info!("Snapshot caching enabled");
        Arc::new(CachingSnapshotProvider::new(store.clone()))
    } else {
        Arc::new(RebuildingSnapshotProvider::new(store.clone()))
    };

    info!("Ready to serve at port {}!", app_config.port);
    run_server(store, snapshots, app_config.server_config()).await
}
