//! Memory value types and the embedding capability.
//!
//! Three independent sources feed each model call:
//! - recent turns (bounded FIFO window)
//! - similarity-ranked long-term texts (vector store)
//! - a rule-derived user profile summary
//!
//! Their per-query snapshot is an [`AggregatedMemory`].

use crate::error::MemoryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One user utterance paired with the assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// A stored text with the embedding computed when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub text: String,

    /// Never recomputed after insertion.
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// Per-query combination of all memory sources, prior to rendering.
///
/// Owns copies of everything it holds, so mutating a store after
/// aggregation never changes what gets rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedMemory {
    /// Recent turns, oldest first.
    pub context: Vec<Turn>,

    /// Retrieved texts, most similar first.
    pub retrieval: Vec<String>,

    /// Rendered profile lines; empty when nothing is known.
    pub profile: String,
}

/// The `text -> vector` capability consumed by the vector store.
///
/// Implementations must be deterministic for identical input and return a
/// fixed dimensionality for the lifetime of one store.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Human-readable name (e.g., "hash", "openrouter").
    fn name(&self) -> &str;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, MemoryError>;
}
