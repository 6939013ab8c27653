//! Corpus snapshots and the providers that hand them out.
//!
//! A snapshot bundles everything a ranking call needs (songs, embedding
//! model, song vectors) behind a fingerprint of the corpus contents. The
//! vector layout depends on the corpus-derived genre vocabulary, so a
//! snapshot is never mutated; any corpus change means a full rebuild.

use super::embedding::{EmbeddingModel, EmbeddingTrainer};
use super::error::RecommendError;
use super::vectorize::SongVectorMap;
use crate::catalog::Song;
use crate::store::LibraryStore;
use anyhow::Context;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct CorpusSnapshot {
    pub songs: Vec<Song>,
    pub model: EmbeddingModel,
    pub vectors: SongVectorMap,
    pub fingerprint: String,
}

impl CorpusSnapshot {
    pub fn build(songs: Vec<Song>) -> Result<CorpusSnapshot, RecommendError> {
        let fingerprint = corpus_fingerprint(&songs)?;
        Self::build_fingerprinted(songs, fingerprint)
    }

    fn build_fingerprinted(
        songs: Vec<Song>,
        fingerprint: String,
    ) -> Result<CorpusSnapshot, RecommendError> {
        let model = EmbeddingTrainer::default().train(&songs)?;
        let vectors = SongVectorMap::build(&songs, &model);
        debug!(
            songs = songs.len(),
            vocabulary = model.vocabulary_len(),
            dims = vectors.total_dim(),
            fingerprint = &fingerprint[..23],
            "corpus snapshot built"
        );
        Ok(CorpusSnapshot {
            songs,
            model,
            vectors,
            fingerprint,
        })
    }
}

/// SHA256 of every song record in corpus order. The digest covers output
/// metadata too, so an enrichment pass also invalidates cached snapshots.
pub fn corpus_fingerprint(songs: &[Song]) -> Result<String, RecommendError> {
    let mut hasher = Sha256::new();
    for song in songs {
        let bytes = serde_json::to_vec(song).context("serialize song for fingerprint")?;
        hasher.update(&bytes);
        hasher.update(b"\n");
    }
    Ok(format!("sha256:{:x}", hasher.finalize()))
}

/// Hands out the snapshot a ranking call should score against.
pub trait SnapshotProvider: Send + Sync {
    fn snapshot(&self) -> Result<Arc<CorpusSnapshot>, RecommendError>;
}

/// Rebuilds the snapshot from the store on every call.
pub struct RebuildingSnapshotProvider {
    store: Arc<dyn LibraryStore>,
}

impl RebuildingSnapshotProvider {
    pub fn new(store: Arc<dyn LibraryStore>) -> RebuildingSnapshotProvider {
        RebuildingSnapshotProvider { store }
    }
}

impl SnapshotProvider for RebuildingSnapshotProvider {
    fn snapshot(&self) -> Result<Arc<CorpusSnapshot>, RecommendError> {
        let songs = self.store.all_songs()?;
        Ok(Arc::new(CorpusSnapshot::build(songs)?))
    }
}

/// Reuses the previous snapshot while the corpus fingerprint is unchanged.
/// The lock is held across a rebuild so concurrent callers never build
/// duplicate snapshots.
pub struct CachingSnapshotProvider {
    store: Arc<dyn LibraryStore>,
    cached: Mutex<Option<Arc<CorpusSnapshot>>>,
}

impl CachingSnapshotProvider {
    pub fn new(store: Arc<dyn LibraryStore>) -> CachingSnapshotProvider {
        CachingSnapshotProvider {
            store,
            cached: Mutex::new(None),
        }
    }
}

impl SnapshotProvider for CachingSnapshotProvider {
    fn snapshot(&self) -> Result<Arc<CorpusSnapshot>, RecommendError> {
        let songs = self.store.all_songs()?;
        let fingerprint = corpus_fingerprint(&songs)?;
        let mut cached = self.cached.lock().unwrap();
        if let Some(snapshot) = cached.as_ref() {
            if snapshot.fingerprint == fingerprint {
                return Ok(Arc::clone(snapshot));
            }
        }
        let snapshot = Arc::new(CorpusSnapshot::build_fingerprinted(songs, fingerprint)?);
        *cached = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
