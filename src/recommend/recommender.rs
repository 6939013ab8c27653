//! The engine facade: wires the store, snapshots, and the four rankers.

use super::collaborative::{recommend_from_peers, InteractionMatrix, PeerMatch};
use super::content::{rank_by_content, YearRange};
use super::error::RecommendError;
use super::hybrid::rank_hybrid;
use super::profile::build_profile;
use super::rank::{HybridScoredSong, RankedSong};
use super::snapshot::SnapshotProvider;
use super::theme::rank_by_theme;
use crate::catalog::Song;
use crate::store::LibraryStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct CollaborativeRecommendation {
    pub peers: Vec<PeerMatch>,
    pub songs: Vec<RankedSong>,
}

pub struct Recommender {
    store: Arc<dyn LibraryStore>,
    snapshots: Arc<dyn SnapshotProvider>,
}

impl Recommender {
    pub fn new(store: Arc<dyn LibraryStore>, snapshots: Arc<dyn SnapshotProvider>) -> Recommender {
        Recommender { store, snapshots }
    }

    // ========================================================================
    // Ranking operations
    // ========================================================================

    pub fn recommend_by_content(
        &self,
        user_id: &str,
        top_n: usize,
        years: Option<YearRange>,
    ) -> Result<Vec<RankedSong>, RecommendError> {
        let liked = self.liked_titles(user_id)?;
        let snapshot = self.snapshots.snapshot()?;
        let profile = build_profile(user_id, &liked, &snapshot.vectors)?;
        Ok(rank_by_content(
            &profile,
            &snapshot.songs,
            &snapshot.vectors,
            top_n,
            years,
        ))
    }

    /// Peer-based candidates. Works off likes alone, so it stays available
    /// even when no song in the library has trainable lyrics. Candidates
    /// carry a flat 0.0 score; their order is a deterministic walk of the
    /// peers' likes, not a ranking.
    pub fn recommend_collaborative(
        &self,
        user_id: &str,
        top_k: usize,
        max_candidates: usize,
    ) -> Result<CollaborativeRecommendation, RecommendError> {
        let matrix = self.interaction_matrix()?;
        let peer_rec = recommend_from_peers(&matrix, user_id, top_k, max_candidates)?;

        let songs = self.store.all_songs()?;
        let by_title = first_by_title(&songs);
        let rows = peer_rec
            .titles
            .iter()
            .map(|title| match by_title.get(title.as_str()) {
                Some(song) => RankedSong::from_song(song, 0.0),
                None => RankedSong::from_title(title, 0.0),
            })
            .collect();
        Ok(CollaborativeRecommendation {
            peers: peer_rec.peers,
            songs: rows,
        })
    }

    pub fn recommend_hybrid(
        &self,
        user_id: &str,
        content_weight: f32,
        collab_weight: f32,
        top_k: usize,
        top_n: usize,
    ) -> Result<Vec<HybridScoredSong>, RecommendError> {
        let liked = self.liked_titles(user_id)?;
        let snapshot = self.snapshots.snapshot()?;
        let profile = build_profile(user_id, &liked, &snapshot.vectors)?;
        let matrix = self.interaction_matrix()?;
        rank_hybrid(
            &profile,
            &snapshot.songs,
            &snapshot.vectors,
            &matrix,
            content_weight,
            collab_weight,
            top_k,
            top_n,
        )
    }

    pub fn recommend_by_theme(
        &self,
        query: &str,
        top_n: usize,
    ) -> Result<Vec<RankedSong>, RecommendError> {
        let snapshot = self.snapshots.snapshot()?;
        rank_by_theme(query, &snapshot.songs, &snapshot.model, top_n)
    }

    // ========================================================================
    // Store plumbing
    // ========================================================================

    fn liked_titles(&self, user_id: &str) -> Result<Vec<String>, RecommendError> {
        self.store
            .liked_titles(user_id)?
            .ok_or_else(|| RecommendError::UnknownUser(user_id.to_string()))
    }

    fn interaction_matrix(&self) -> Result<InteractionMatrix, RecommendError> {
        let mut users: Vec<(String, Vec<String>)> = Vec::new();
        for user_id in self.store.all_user_ids()? {
            let likes = self.store.liked_titles(&user_id)?.unwrap_or_default();
            users.push((user_id, likes));
        }
        let matrix = InteractionMatrix::build(&users);
        debug!(
            users = matrix.user_count(),
            titles = matrix.title_count(),
            "interaction matrix built"
        );
        Ok(matrix)
    }
}

fn first_by_title(songs: &[Song]) -> HashMap<&str, &Song> {
    let mut by_title: HashMap<&str, &Song> = HashMap::new();
    for song in songs {
        if song.has_title() {
            by_title.entry(song.title.as_str()).or_insert(song);
        }
    }
    by_title
}
