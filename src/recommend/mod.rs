mod collaborative;
mod content;
mod embedding;
mod error;
mod hybrid;
mod profile;
mod rank;
mod recommender;
mod similarity;
mod snapshot;
mod text;
mod theme;
mod vectorize;

pub use collaborative::{InteractionMatrix, PeerMatch};
pub use content::YearRange;
pub use embedding::{EmbeddingModel, EmbeddingTrainer};
pub use error::RecommendError;
pub use rank::{HybridScoredSong, RankedSong};
pub use recommender::{CollaborativeRecommendation, Recommender};
pub use snapshot::{
    CachingSnapshotProvider, CorpusSnapshot, RebuildingSnapshotProvider, SnapshotProvider,
};
pub use vectorize::SongVectorMap;
