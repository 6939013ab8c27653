//! Text normalization and keyword extraction.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Everything outside Hangul syllables, ASCII letters and whitespace is
    /// stripped before tokenization, so digits and punctuation never reach
    /// the embedding space.
    static ref DISALLOWED: Regex = Regex::new(r"[^가-힣a-zA-Z\s]").unwrap();

    /// Korean particles plus English function words.
    static ref STOPWORDS: HashSet<&'static str> = [
        "때", "할때", "가", "은", "는", "이", "의", "에", "를", "을", "도", "과", "와",
        "한", "또", "좀", "더", "까지", "만", "으로", "하고", "에서", "the", "is", "are",
        "to", "and", "a", "of", "on", "in", "for", "with", "by", "at", "an", "it", "be",
        "as", "this", "that",
    ]
    .into_iter()
    .collect();
}

/// Minimum keyword length, counted in characters so Hangul is not penalized.
const MIN_KEYWORD_CHARS: usize = 2;

/// Lowercases, strips disallowed characters and splits on whitespace.
/// Pure; identical input always yields the same token sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    cleaned.split_whitespace().map(str::to_string).collect()
}

/// Keyword filtering for theme queries: tokens surviving the stopword set and
/// the minimum length. Vectorization paths use [`tokenize`] directly and are
/// never stopword-filtered.
pub fn extract_keywords(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|word| {
            !STOPWORDS.contains(word.as_str()) && word.chars().count() >= MIN_KEYWORD_CHARS
        })
        .collect()
}
