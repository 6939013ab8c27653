mod memory_store;
mod schema;
mod sqlite_store;
mod trait_def;

pub use memory_store::MemoryLibraryStore;
pub use sqlite_store::SqliteLibraryStore;
pub use trait_def::{LibraryStore, LibraryStoreWriter};
