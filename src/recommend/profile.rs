//! User taste profiles aggregated from liked songs.

use super::error::RecommendError;
use super::similarity::mean_vector;
use super::vectorize::SongVectorMap;

/// A user's aggregate taste: the arithmetic mean of the vectors of their
/// liked songs, restricted to titles present in the vector map.
pub struct UserProfile {
    pub user_id: String,
    pub liked_titles: Vec<String>,
    pub vector: Vec<f32>,
}

/// Builds the profile from an already-fetched liked list. Liked titles
/// absent from the vector map contribute nothing; if none is present the
/// profile cannot be formed.
pub fn build_profile(
    user_id: &str,
    liked_titles: &[String],
    vectors: &SongVectorMap,
) -> Result<UserProfile, RecommendError> {
    let matched: Vec<&[f32]> = liked_titles
        .iter()
        .filter_map(|title| vectors.get(title))
        .collect();
    let vector = mean_vector(&matched)
        .ok_or_else(|| RecommendError::NoVectorizableLikes(user_id.to_string()))?;
    Ok(UserProfile {
        user_id: user_id.to_string(),
        liked_titles: liked_titles.to_vec(),
        vector,
    })
}
