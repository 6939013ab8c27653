//! Song vectors: the lyric embedding mean concatenated with multi-hot genres.

use super::embedding::EmbeddingModel;
use super::text::tokenize;
use crate::catalog::Song;
use std::collections::{BTreeSet, HashMap};

/// Title-keyed song vectors over a fixed axis layout. The first `lyric_dim`
/// components hold the mean of the embedding vectors of the song's tokens
/// (zeros when no token hits the model), the remaining components are one
/// flag per distinct genre name, sorted, collected across the whole corpus.
pub struct SongVectorMap {
    lyric_dim: usize,
    genres: Vec<String>,
    vectors: HashMap<String, Vec<f32>>,
}

impl SongVectorMap {
    pub fn build(songs: &[Song], model: &EmbeddingModel) -> SongVectorMap {
        let genres: Vec<String> = songs
            .iter()
            .flat_map(|song| song.genres.iter().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let genre_ids: HashMap<&str, usize> = genres
            .iter()
            .enumerate()
            .map(|(i, genre)| (genre.as_str(), i))
            .collect();

        let lyric_dim = model.dim();
        let mut vectors: HashMap<String, Vec<f32>> = HashMap::new();
        for song in songs {
            if !song.has_title() {
                continue;
            }
            let mut vector = vec![0.0f32; lyric_dim + genres.len()];
            if let Some(mean) = lyric_mean(&tokenize(&song.lyrics.text()), model) {
                vector[..lyric_dim].copy_from_slice(&mean);
            }
            for genre in &song.genres {
                if let Some(id) = genre_ids.get(genre.as_str()) {
                    vector[lyric_dim + id] = 1.0;
                }
            }
            // Duplicate titles keep the vector of the latest occurrence.
            vectors.insert(song.title.clone(), vector);
        }

        SongVectorMap {
            lyric_dim,
            genres,
            vectors,
        }
    }

    pub fn get(&self, title: &str) -> Option<&[f32]> {
        self.vectors.get(title).map(Vec::as_slice)
    }

    pub fn lyric_dim(&self) -> usize {
        self.lyric_dim
    }

    pub fn total_dim(&self) -> usize {
        self.lyric_dim + self.genres.len()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Mean of the embedding vectors of the tokens that hit the model, `None`
/// when none do.
pub fn lyric_mean(tokens: &[String], model: &EmbeddingModel) -> Option<Vec<f32>> {
    let hits: Vec<&[f32]> = tokens
        .iter()
        .filter_map(|token| model.lookup(token))
        .collect();
    super::similarity::mean_vector(&hits)
}
