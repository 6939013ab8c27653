//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server over its own temporary library.

use super::constants::*;
use super::fixtures::create_test_library;
use serenata_server::recommend::{RebuildingSnapshotProvider, SnapshotProvider};
use serenata_server::server::{server::make_app, RequestsLoggingLevel, ServerConfig};
use serenata_server::store::{LibraryStore, SqliteLibraryStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated seeded library
///
/// When dropped, the server gracefully shuts down and temp resources are
/// cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Creates a temporary library database with test data
    /// 2. Binds to a random port (127.0.0.1:0)
    /// 3. Spawns the server in a background task
    /// 4. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if library creation fails, port binding fails or the server
    /// doesn't become ready within the timeout.
    pub async fn spawn() -> Self {
        let (temp_dir, db_path) = create_test_library().expect("Failed to create test library");

        let store: Arc<dyn LibraryStore> = Arc::new(
            SqliteLibraryStore::new(&db_path).expect("Failed to open library store"),
        );
        let snapshots: Arc<dyn SnapshotProvider> =
            Arc::new(RebuildingSnapshotProvider::new(store.clone()));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            port,
            top_n: 10,
            peer_count: 2,
            content_weight: 0.8,
            collab_weight: 0.2,
        };

        let app = make_app(config, store, snapshots).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _temp_dir: temp_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir is cleaned up automatically
    }
}
