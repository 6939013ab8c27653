//! Theme matching: ranks songs against a free-text query.
//!
//! Two lyric signals (keyword-to-word similarity and mean-vector similarity)
//! blend into a lyric score, which then blends with a title similarity
//! computed from the full query text. Only the first `MAX_LYRIC_WORDS`
//! tokens of a song's lyrics take part in scoring; training always sees the
//! full lyrics.

use super::embedding::EmbeddingModel;
use super::error::RecommendError;
use super::rank::RankedSong;
use super::similarity::{cosine_similarity, mean_vector};
use super::text::{extract_keywords, tokenize};
use crate::catalog::Song;
use std::collections::HashSet;

/// Lyric tokens considered per song, capped before vocabulary filtering.
const MAX_LYRIC_WORDS: usize = 100;
/// Per keyword, the mean of this many best word matches.
const TOP_WORD_MATCHES: usize = 3;
const WORD_LEVEL_WEIGHT: f32 = 0.6;
const SENTENCE_WEIGHT: f32 = 0.4;
const TITLE_WEIGHT: f32 = 0.5;

/// Scores every distinct `(title, artist)` song against the query and
/// returns the `top_n` best, score descending, corpus order on ties. Fails
/// only when the query yields no keywords; a query that matches nothing
/// still ranks, all zeros.
pub fn rank_by_theme(
    query: &str,
    songs: &[Song],
    model: &EmbeddingModel,
    top_n: usize,
) -> Result<Vec<RankedSong>, RecommendError> {
    let keywords = extract_keywords(query);
    if keywords.is_empty() {
        return Err(RecommendError::EmptyKeywords(query.to_string()));
    }
    let keyword_vectors: Vec<&[f32]> = keywords
        .iter()
        .filter_map(|keyword| model.lookup(keyword))
        .collect();
    let keyword_mean = mean_vector(&keyword_vectors);

    // Title similarity uses every query word, stopwords included.
    let query_tokens = tokenize(query);
    let query_vectors: Vec<&[f32]> = query_tokens
        .iter()
        .filter_map(|token| model.lookup(token))
        .collect();
    let query_mean = mean_vector(&query_vectors);

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut ranked: Vec<RankedSong> = Vec::new();
    for song in songs {
        if !song.has_title() {
            continue;
        }
        if !seen.insert((song.title.as_str(), song.artist.as_str())) {
            continue;
        }

        let lyric_tokens = tokenize(&song.lyrics.text());
        let lyric_vectors: Vec<&[f32]> = lyric_tokens
            .iter()
            .take(MAX_LYRIC_WORDS)
            .filter_map(|token| model.lookup(token))
            .collect();

        let word_level = word_level_score(&keyword_vectors, &lyric_vectors);
        let sentence = match (&keyword_mean, mean_vector(&lyric_vectors)) {
            (Some(keywords), Some(lyrics)) => cosine_similarity(keywords, &lyrics),
            _ => 0.0,
        };
        let lyric_score = WORD_LEVEL_WEIGHT * word_level + SENTENCE_WEIGHT * sentence;

        let title = title_similarity(query_mean.as_deref(), &song.title, model);
        let score = (1.0 - TITLE_WEIGHT) * lyric_score + TITLE_WEIGHT * title;
        ranked.push(RankedSong::from_song(song, score));
    }

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_n);
    Ok(ranked)
}

/// Mean over keywords of the mean of each keyword's best word matches.
/// 0.0 when either side has no vocabulary hit.
fn word_level_score(keyword_vectors: &[&[f32]], lyric_vectors: &[&[f32]]) -> f32 {
    if keyword_vectors.is_empty() || lyric_vectors.is_empty() {
        return 0.0;
    }
    let mut per_keyword: Vec<f32> = Vec::with_capacity(keyword_vectors.len());
    for keyword in keyword_vectors {
        let mut similarities: Vec<f32> = lyric_vectors
            .iter()
            .map(|word| cosine_similarity(keyword, word))
            .collect();
        similarities.sort_by(|a, b| b.total_cmp(a));
        let top = &similarities[..similarities.len().min(TOP_WORD_MATCHES)];
        per_keyword.push(top.iter().sum::<f32>() / top.len() as f32);
    }
    per_keyword.iter().sum::<f32>() / per_keyword.len() as f32
}

fn title_similarity(query_mean: Option<&[f32]>, title: &str, model: &EmbeddingModel) -> f32 {
    let Some(query_mean) = query_mean else {
        return 0.0;
    };
    let title_tokens = tokenize(title);
    let title_vectors: Vec<&[f32]> = title_tokens
        .iter()
        .filter_map(|token| model.lookup(token))
        .collect();
    match mean_vector(&title_vectors) {
        Some(title_mean) => cosine_similarity(query_mean, &title_mean),
        None => 0.0,
    }
}
