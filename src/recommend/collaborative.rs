//! Collaborative filtering over a binary user-by-song interaction matrix.

use super::error::RecommendError;
use super::similarity::cosine_similarity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A peer user selected by interaction overlap, reported back to the caller
/// as provenance for the candidate list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeerMatch {
    #[serde(rename = "user")]
    pub user_id: String,
    pub similarity: f32,
}

/// Rows are users in store order, columns the sorted union of all liked
/// titles, cells 1.0 for a like and 0.0 otherwise. Rebuilt from scratch per
/// invocation; nothing here survives a request.
pub struct InteractionMatrix {
    user_ids: Vec<String>,
    titles: Vec<String>,
    rows: Vec<Vec<f32>>,
}

impl InteractionMatrix {
    pub fn build(users: &[(String, Vec<String>)]) -> InteractionMatrix {
        let titles: Vec<String> = users
            .iter()
            .flat_map(|(_, likes)| likes.iter().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let title_ids: HashMap<&str, usize> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| (title.as_str(), i))
            .collect();
        let rows: Vec<Vec<f32>> = users
            .iter()
            .map(|(_, likes)| {
                let mut row = vec![0.0f32; titles.len()];
                for title in likes {
                    if let Some(id) = title_ids.get(title.as_str()) {
                        row[*id] = 1.0;
                    }
                }
                row
            })
            .collect();
        InteractionMatrix {
            user_ids: users.iter().map(|(user_id, _)| user_id.clone()).collect(),
            titles,
            rows,
        }
    }

    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    pub fn title_count(&self) -> usize {
        self.titles.len()
    }

    pub fn row_of(&self, user_id: &str) -> Option<usize> {
        self.user_ids.iter().position(|user| user == user_id)
    }

    /// The `top_k` other rows by cosine to the target row, similarity
    /// descending, row order on ties. A user with no likes compares at 0.0
    /// against everyone and can still be picked.
    pub fn top_peers(&self, target: usize, top_k: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(row, _)| *row != target)
            .map(|(row, vector)| (row, cosine_similarity(&self.rows[target], vector)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);
        scored
    }

    pub fn peer_matches(&self, peers: &[(usize, f32)]) -> Vec<PeerMatch> {
        peers
            .iter()
            .map(|(row, similarity)| PeerMatch {
                user_id: self.user_ids[*row].clone(),
                similarity: *similarity,
            })
            .collect()
    }

    /// How many of the given peers like each title the target does not,
    /// in column order, zero counts omitted.
    pub fn peer_frequencies(&self, target: usize, peers: &[(usize, f32)]) -> Vec<(String, u32)> {
        let mut frequencies = Vec::new();
        for column in 0..self.titles.len() {
            if self.rows[target][column] > 0.0 {
                continue;
            }
            let count = peers
                .iter()
                .filter(|(row, _)| self.rows[*row][column] > 0.0)
                .count() as u32;
            if count > 0 {
                frequencies.push((self.titles[column].clone(), count));
            }
        }
        frequencies
    }
}

pub struct PeerRecommendation {
    pub peers: Vec<PeerMatch>,
    /// Candidate titles in enumeration order: peer rank first, then column
    /// order within each peer. This is a deterministic walk of the peers'
    /// likes, not a similarity ranking.
    pub titles: Vec<String>,
}

pub fn recommend_from_peers(
    matrix: &InteractionMatrix,
    target_user: &str,
    top_k: usize,
    max_candidates: usize,
) -> Result<PeerRecommendation, RecommendError> {
    let target = matrix
        .row_of(target_user)
        .ok_or_else(|| RecommendError::UnknownUser(target_user.to_string()))?;
    let peers = matrix.top_peers(target, top_k);

    let mut collected: HashSet<&str> = HashSet::new();
    let mut titles: Vec<String> = Vec::new();
    'peers: for (row, _) in &peers {
        for column in 0..matrix.titles.len() {
            if titles.len() >= max_candidates {
                break 'peers;
            }
            if matrix.rows[*row][column] > 0.0
                && matrix.rows[target][column] == 0.0
                && collected.insert(matrix.titles[column].as_str())
            {
                titles.push(matrix.titles[column].clone());
            }
        }
    }

    Ok(PeerRecommendation {
        peers: matrix.peer_matches(&peers),
        titles,
    })
}
