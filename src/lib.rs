//! Serenata Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod recommend;
pub mod server;
pub mod store;

// Re-export commonly used types for convenience
pub use recommend::{RecommendError, Recommender};
pub use server::{run_server, RequestsLoggingLevel};
pub use store::{LibraryStore, MemoryLibraryStore, SqliteLibraryStore};
