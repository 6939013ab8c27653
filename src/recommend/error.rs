use thiserror::Error;

/// Failures a ranking operation can surface to the API layer.
///
/// The first four are user-facing conditions with dedicated responses;
/// `Store` wraps backend failures and stays generic on the wire. Numeric
/// degenerate cases (zero norms, empty overlaps) are never errors, they
/// resolve to 0.0 scores or empty contributions.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// No song in the corpus yields a non-empty lyric token sequence.
    #[error("no song in the library has trainable lyrics")]
    EmptyCorpus,

    #[error("unknown user '{0}'")]
    UnknownUser(String),

    /// The user's liked titles don't intersect the vectorized corpus.
    #[error("none of the songs liked by '{0}' can be vectorized")]
    NoVectorizableLikes(String),

    /// Every query token was lost to the stopword and length filters.
    #[error("no usable keyword in query '{0}'")]
    EmptyKeywords(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
