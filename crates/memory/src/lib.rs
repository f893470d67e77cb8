//! Memory stores for memtier.
//!
//! - [`BoundedContextStore`]: last-N turns, FIFO eviction
//! - [`VectorMemoryStore`]: append-only texts ranked by cosine similarity
//! - [`ProfileStore`]: rule-derived preference and style
//! - [`MemoryRouter`]: one [`AggregatedMemory`](memtier_core::AggregatedMemory) per query

pub mod context;
pub mod embedding;
pub mod profile;
pub mod router;
pub mod vector;

pub use context::BoundedContextStore;
pub use embedding::{HashEmbedder, ProviderEmbedder};
pub use profile::{ProfileState, ProfileStore, ProfileUpdate};
pub use router::MemoryRouter;
pub use vector::{cosine_similarity, rank_by_similarity, ScoredText, VectorMemoryStore};
