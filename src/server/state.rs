use axum::extract::FromRef;

use crate::recommend::Recommender;
use crate::store::LibraryStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedLibraryStore = Arc<dyn LibraryStore>;
pub type GuardedRecommender = Arc<Recommender>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub store: GuardedLibraryStore,
    pub recommender: GuardedRecommender,
}

impl FromRef<ServerState> for GuardedLibraryStore {
    fn from_ref(input: &ServerState) -> Self {
        input.store.clone()
    }
}

impl FromRef<ServerState> for GuardedRecommender {
    fn from_ref(input: &ServerState) -> Self {
        input.recommender.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
