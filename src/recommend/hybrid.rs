//! Hybrid ranking: weighted fusion of content cosine and peer frequency.
//!
//! The fused score sums a bounded cosine with an unweighted peer count, so
//! the collaborative term can dominate once enough peers agree. The formula
//! is kept literal and both raw components ride along in the output rows.

use super::collaborative::InteractionMatrix;
use super::error::RecommendError;
use super::profile::UserProfile;
use super::rank::HybridScoredSong;
use super::similarity::cosine_similarity;
use super::vectorize::SongVectorMap;
use crate::catalog::Song;
use std::collections::{HashMap, HashSet};

/// Ranks the union of nonzero-content and nonzero-frequency candidates.
/// Candidates enumerate in corpus order, then matrix column order for
/// frequency-only titles; the stable sort preserves that order on ties.
#[allow(clippy::too_many_arguments)]
pub fn rank_hybrid(
    profile: &UserProfile,
    songs: &[Song],
    vectors: &SongVectorMap,
    matrix: &InteractionMatrix,
    content_weight: f32,
    collab_weight: f32,
    top_k: usize,
    top_n: usize,
) -> Result<Vec<HybridScoredSong>, RecommendError> {
    let target = matrix
        .row_of(&profile.user_id)
        .ok_or_else(|| RecommendError::UnknownUser(profile.user_id.clone()))?;
    let peers = matrix.top_peers(target, top_k);
    let frequencies = matrix.peer_frequencies(target, &peers);
    let frequency_of: HashMap<&str, u32> = frequencies
        .iter()
        .map(|(title, count)| (title.as_str(), *count))
        .collect();

    let liked: HashSet<&str> = profile.liked_titles.iter().map(String::as_str).collect();
    let mut by_title: HashMap<&str, &Song> = HashMap::new();
    for song in songs {
        if song.has_title() {
            by_title.entry(song.title.as_str()).or_insert(song);
        }
    }

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut rows: Vec<HybridScoredSong> = Vec::new();
    let push = |song: &Song, content: f32, frequency: u32, rows: &mut Vec<HybridScoredSong>| {
        rows.push(HybridScoredSong {
            title: song.title.clone(),
            artist: song.artist.clone(),
            duration: song.duration.clone().unwrap_or_else(|| "--".to_string()),
            media_link: song.media_url.clone().unwrap_or_default(),
            score: content_weight * content + collab_weight * frequency as f32,
            content_score: content,
            peer_frequency: frequency,
        });
    };

    for song in songs {
        if !song.has_title()
            || liked.contains(song.title.as_str())
            || emitted.contains(song.title.as_str())
        {
            continue;
        }
        let Some(vector) = vectors.get(&song.title) else {
            continue;
        };
        let content = cosine_similarity(&profile.vector, vector);
        let frequency = frequency_of.get(song.title.as_str()).copied().unwrap_or(0);
        if content == 0.0 && frequency == 0 {
            continue;
        }
        emitted.insert(song.title.as_str());
        push(song, content, frequency, &mut rows);
    }

    // Peer-liked titles the corpus walk missed; titles with no catalog row
    // at all are dropped here.
    for (title, frequency) in &frequencies {
        if emitted.contains(title.as_str()) {
            continue;
        }
        let Some(song) = by_title.get(title.as_str()) else {
            continue;
        };
        let content = vectors
            .get(title)
            .map(|vector| cosine_similarity(&profile.vector, vector))
            .unwrap_or(0.0);
        emitted.insert(title.as_str());
        push(song, content, *frequency, &mut rows);
    }

    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    rows.truncate(top_n);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Lyrics;
    use crate::recommend::embedding::EmbeddingTrainer;
    use crate::recommend::profile::build_profile;

    fn song(title: &str, genres: &[&str]) -> Song {
        Song {
            title: title.to_string(),
            artist: "test".to_string(),
            lyrics: Lyrics::Raw(String::new()),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            release_year: None,
            duration: None,
            media_url: None,
        }
    }

    fn fixture() -> (Vec<Song>, SongVectorMap, InteractionMatrix) {
        let mut songs = vec![Song {
            title: "Anchor".to_string(),
            artist: "Trainer".to_string(),
            lyrics: Lyrics::Raw("anchor words keep the model trainable".to_string()),
            genres: vec![],
            release_year: None,
            duration: None,
            media_url: None,
        }];
        songs.push(song("Seed", &["pop"]));
        // Four genre flags, one shared with the profile: cosine is 1/2.
        songs.push(song("Quad", &["pop", "ambient", "folk", "rock"]));
        songs.push(song("OffBeat", &["jazz"]));
        songs.push(song("Silent", &["jazz"]));
        let model = EmbeddingTrainer::default().train(&songs).unwrap();
        let map = SongVectorMap::build(&songs, &model);
        let like = |titles: &[&str]| titles.iter().map(|t| t.to_string()).collect();
        let users = vec![
            ("u1".to_string(), like(&["Seed"])),
            ("u2".to_string(), like(&["Seed", "Quad", "OffBeat", "Phantom"])),
        ];
        let matrix = InteractionMatrix::build(&users);
        (songs, map, matrix)
    }

    fn profile(map: &SongVectorMap) -> UserProfile {
        build_profile("u1", &["Seed".to_string()], map).unwrap()
    }

    #[test]
    fn fused_score_is_the_literal_weighted_sum() {
        let (songs, map, matrix) = fixture();
        let rows =
            rank_hybrid(&profile(&map), &songs, &map, &matrix, 0.8, 0.2, 2, 10).unwrap();
        let quad = rows.iter().find(|r| r.title == "Quad").unwrap();
        assert!((quad.content_score - 0.5).abs() < 1e-6);
        assert_eq!(quad.peer_frequency, 1);
        assert!((quad.score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn frequency_only_candidates_are_kept() {
        let (songs, map, matrix) = fixture();
        let rows =
            rank_hybrid(&profile(&map), &songs, &map, &matrix, 0.8, 0.2, 2, 10).unwrap();
        let offbeat = rows.iter().find(|r| r.title == "OffBeat").unwrap();
        assert_eq!(offbeat.content_score, 0.0);
        assert_eq!(offbeat.peer_frequency, 1);
        assert!((offbeat.score - 0.2).abs() < 1e-6);
    }

    #[test]
    fn zero_content_zero_frequency_is_excluded() {
        let (songs, map, matrix) = fixture();
        let rows =
            rank_hybrid(&profile(&map), &songs, &map, &matrix, 0.8, 0.2, 2, 10).unwrap();
        assert!(rows.iter().all(|r| r.title != "Silent"));
        assert!(rows.iter().all(|r| r.title != "Anchor"));
    }

    #[test]
    fn liked_titles_and_uncataloged_candidates_are_dropped() {
        let (songs, map, matrix) = fixture();
        let rows =
            rank_hybrid(&profile(&map), &songs, &map, &matrix, 0.8, 0.2, 2, 10).unwrap();
        assert!(rows.iter().all(|r| r.title != "Seed"));
        // "Phantom" is peer-liked but has no catalog row.
        assert!(rows.iter().all(|r| r.title != "Phantom"));
    }

    #[test]
    fn rows_come_back_score_descending() {
        let (songs, map, matrix) = fixture();
        let rows =
            rank_hybrid(&profile(&map), &songs, &map, &matrix, 0.8, 0.2, 2, 10).unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Quad", "OffBeat"]);
    }

    #[test]
    fn unknown_user_is_an_error() {
        let (songs, map, matrix) = fixture();
        let ghost = build_profile("ghost", &["Seed".to_string()], &map).unwrap();
        let result = rank_hybrid(&ghost, &songs, &map, &matrix, 0.8, 0.2, 2, 10);
        assert!(matches!(result, Err(RecommendError::UnknownUser(_))));
    }

    #[test]
    fn top_n_truncates() {
        let (songs, map, matrix) = fixture();
        let rows =
            rank_hybrid(&profile(&map), &songs, &map, &matrix, 0.8, 0.2, 2, 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Quad");
    }
}
