//! Word embeddings trained by deterministic random indexing.
//!
//! Every vocabulary word owns a fixed signed signature (a handful of
//! (index, sign) slots derived from a hash of the word). A word's vector is
//! its own signature plus the log-damped signatures of every word
//! co-occurring within the context window, L2-normalized. Words sharing
//! contexts end up with similar vectors. There is no RNG state anywhere, so
//! identical corpora produce bit-identical models.

use super::error::RecommendError;
use super::text::tokenize;
use crate::catalog::Song;
use std::collections::{BTreeMap, HashMap};

/// Slots per word signature. More slots smooth the hash noise, fewer keep
/// vectors sparse; 8 works well for the ~100 dimension default.
const SIGNATURE_SLOTS: usize = 8;

pub struct EmbeddingTrainer {
    pub dim: usize,
    pub window: usize,
    pub min_count: usize,
}

impl Default for EmbeddingTrainer {
    fn default() -> Self {
        EmbeddingTrainer {
            dim: 100,
            window: 5,
            min_count: 1,
        }
    }
}

impl EmbeddingTrainer {
    /// Trains a model from the corpus, one token sequence per song. Songs
    /// yielding zero tokens are excluded; if every song does, training fails
    /// with [`RecommendError::EmptyCorpus`].
    pub fn train(&self, songs: &[Song]) -> Result<EmbeddingModel, RecommendError> {
        let sentences: Vec<Vec<String>> = songs
            .iter()
            .map(|song| tokenize(&song.lyrics.text()))
            .filter(|tokens| !tokens.is_empty())
            .collect();
        if sentences.is_empty() {
            return Err(RecommendError::EmptyCorpus);
        }
        Ok(self.train_sentences(&sentences))
    }

    fn train_sentences(&self, sentences: &[Vec<String>]) -> EmbeddingModel {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for sentence in sentences {
            for word in sentence {
                *counts.entry(word).or_insert(0) += 1;
            }
        }

        // Vocabulary in first-appearance order; below-threshold words are
        // dropped both as centers and as contexts.
        let mut vocab: Vec<String> = Vec::new();
        let mut vocab_ids: HashMap<&str, u32> = HashMap::new();
        for sentence in sentences {
            for word in sentence {
                if vocab_ids.contains_key(word.as_str()) {
                    continue;
                }
                if counts[word.as_str()] >= self.min_count {
                    vocab_ids.insert(word, vocab.len() as u32);
                    vocab.push(word.clone());
                }
            }
        }

        // BTreeMap keeps the accumulation order stable, which keeps the
        // floating point sums bit-identical across runs.
        let mut pair_counts: BTreeMap<(u32, u32), u32> = BTreeMap::new();
        for sentence in sentences {
            let ids: Vec<Option<u32>> = sentence
                .iter()
                .map(|word| vocab_ids.get(word.as_str()).copied())
                .collect();
            for (i, center) in ids.iter().enumerate() {
                let Some(center) = center else { continue };
                let lo = i.saturating_sub(self.window);
                let hi = (i + self.window).min(ids.len() - 1);
                for (j, context) in ids.iter().enumerate().take(hi + 1).skip(lo) {
                    if j == i {
                        continue;
                    }
                    if let Some(context) = context {
                        *pair_counts.entry((*center, *context)).or_insert(0) += 1;
                    }
                }
            }
        }

        let signatures: Vec<Vec<(usize, f32)>> = vocab
            .iter()
            .map(|word| signature(word, self.dim))
            .collect();

        let mut vectors = vec![vec![0.0f32; self.dim]; vocab.len()];
        // A word's own signature anchors it, so single-occurrence words with
        // no context still get a usable vector.
        for (word_id, word_signature) in signatures.iter().enumerate() {
            for (index, sign) in word_signature {
                vectors[word_id][*index] += sign;
            }
        }
        for ((center, context), count) in &pair_counts {
            let weight = (1.0 + *count as f32).ln();
            for (index, sign) in &signatures[*context as usize] {
                vectors[*center as usize][*index] += sign * weight;
            }
        }

        for vector in vectors.iter_mut() {
            let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for value in vector.iter_mut() {
                    *value /= norm;
                }
            }
        }

        let vectors: HashMap<String, Vec<f32>> =
            vocab.into_iter().zip(vectors).collect();
        EmbeddingModel {
            dim: self.dim,
            vectors,
        }
    }
}

pub struct EmbeddingModel {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingModel {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vectors.len()
    }

    /// Hit only for words seen at least `min_count` times in training.
    pub fn lookup(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf29ce484222325u64;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

fn signature(word: &str, dim: usize) -> Vec<(usize, f32)> {
    let mut state = fnv1a64(word.as_bytes());
    (0..SIGNATURE_SLOTS)
        .map(|_| {
            let value = splitmix64(&mut state);
            let index = (value % dim as u64) as usize;
            let sign = if value & (1 << 63) == 0 { 1.0 } else { -1.0 };
            (index, sign)
        })
        .collect()
}
