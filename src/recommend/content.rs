//! Content ranking: cosine against the user profile plus an artist bonus.

use super::profile::UserProfile;
use super::rank::RankedSong;
use super::similarity::cosine_similarity;
use super::vectorize::SongVectorMap;
use crate::catalog::Song;
use std::collections::HashSet;

/// Bonus added when a candidate's artist also appears among the user's
/// liked songs.
const ARTIST_BONUS: f32 = 0.05;

/// Inclusive release-year window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// Scores every eligible corpus song against the profile and returns the
/// `top_n` best, score descending, corpus order on ties.
///
/// Excluded songs: empty titles, already-liked titles, titles without a
/// vector, repeated titles (first occurrence wins), and, when `years` is
/// set, songs whose release year is missing, unparseable, or out of range.
pub fn rank_by_content(
    profile: &UserProfile,
    songs: &[Song],
    vectors: &SongVectorMap,
    top_n: usize,
    years: Option<YearRange>,
) -> Vec<RankedSong> {
    let liked: HashSet<&str> = profile.liked_titles.iter().map(String::as_str).collect();
    let liked_artists: HashSet<&str> = songs
        .iter()
        .filter(|song| liked.contains(song.title.as_str()))
        .map(|song| song.artist.as_str())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut ranked: Vec<RankedSong> = Vec::new();
    for song in songs {
        if !song.has_title() || liked.contains(song.title.as_str()) {
            continue;
        }
        if seen.contains(song.title.as_str()) {
            continue;
        }
        if let Some(range) = years {
            match song.release_year_int() {
                Some(year) if range.contains(year) => {}
                _ => continue,
            }
        }
        let Some(vector) = vectors.get(&song.title) else {
            continue;
        };
        let mut score = cosine_similarity(&profile.vector, vector);
        if liked_artists.contains(song.artist.as_str()) {
            score += ARTIST_BONUS;
        }
        seen.insert(song.title.as_str());
        ranked.push(RankedSong::from_song(song, score));
    }

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_n);
    ranked
}
