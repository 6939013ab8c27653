//! Vector arithmetic shared by every ranking path.

/// Cosine similarity; 0.0 by convention when either operand has zero norm,
/// so degenerate vectors score neutrally instead of failing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let norm = norm_a.sqrt() * norm_b.sqrt();
    if norm == 0.0 {
        0.0
    } else {
        dot / norm
    }
}

/// Element-wise arithmetic mean. None for an empty set, so callers decide
/// their own degenerate behavior.
pub fn mean_vector(vectors: &[&[f32]]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    let mut mean = vec![0.0f32; first.len()];
    for vector in vectors {
        for (slot, value) in mean.iter_mut().zip(vector.iter()) {
            *slot += value;
        }
    }
    let count = vectors.len() as f32;
    for slot in mean.iter_mut() {
        *slot /= count;
    }
    Some(mean)
}
