//! Memory router: aggregates all three sources for a single query.

use crate::context::BoundedContextStore;
use crate::profile::ProfileStore;
use crate::vector::VectorMemoryStore;
use memtier_core::error::MemoryError;
use memtier_core::memory::AggregatedMemory;
use tracing::debug;

/// Borrows the stores for the duration of one aggregation.
///
/// Holding shared references means no store can be mutated while a router
/// exists, and [`collect_memories`](Self::collect_memories) returns owned
/// snapshots, so later writes never reach an already-aggregated value.
#[derive(Debug, Clone, Copy)]
pub struct MemoryRouter<'a> {
    context: &'a BoundedContextStore,
    retrieval: &'a VectorMemoryStore,
    profile: &'a ProfileStore,
    retrieval_k: usize,
}

impl<'a> MemoryRouter<'a> {
    pub const DEFAULT_RETRIEVAL_K: usize = 3;

    pub fn new(
        context: &'a BoundedContextStore,
        retrieval: &'a VectorMemoryStore,
        profile: &'a ProfileStore,
        retrieval_k: usize,
    ) -> Self {
        Self {
            context,
            retrieval,
            profile,
            retrieval_k,
        }
    }

    pub fn retrieval_k(&self) -> usize {
        self.retrieval_k
    }

    /// Snapshot context, top-k retrieval, and profile for `query`.
    ///
    /// Embedding failures from the vector store propagate unchanged.
    pub async fn collect_memories(&self, query: &str) -> Result<AggregatedMemory, MemoryError> {
        let context = self.context.get_context();
        let retrieval = self.retrieval.retrieve(query, self.retrieval_k).await?;
        let profile = self.profile.get_profile_prompt();

        debug!(
            context = context.len(),
            retrieval = retrieval.len(),
            has_profile = !profile.is_empty(),
            "Memories collected"
        );

        Ok(AggregatedMemory {
            context,
            retrieval,
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use async_trait::async_trait;
    use memtier_core::memory::{Embedder, Turn};
    use std::sync::Arc;

    /// Hash embedding, except the text "boom" fails.
    struct FailsOnBoom(HashEmbedder);

    #[async_trait]
    impl Embedder for FailsOnBoom {
        fn name(&self) -> &str {
            "fails_on_boom"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
            if text == "boom" {
                return Err(MemoryError::EmbeddingFailed("quota exhausted".into()));
            }
            self.0.embed(text).await
        }
    }

    fn hash_store() -> VectorMemoryStore {
        VectorMemoryStore::new(Arc::new(HashEmbedder::default()))
    }

    #[tokio::test]
    async fn empty_sources_aggregate_to_empty() {
        let context = BoundedContextStore::new(4).unwrap();
        let retrieval = hash_store();
        let profile = ProfileStore::new();
        let router = MemoryRouter::new(&context, &retrieval, &profile, 3);

        let memories = router.collect_memories("anything").await.unwrap();
        assert_eq!(memories, AggregatedMemory::default());
    }

    #[tokio::test]
    async fn aggregates_every_source() {
        let mut context = BoundedContextStore::new(2).unwrap();
        context.add_turn("Hi", "Hello");

        let mut retrieval = hash_store();
        for text in ["alpha", "beta", "gamma", "delta"] {
            retrieval.add_memory(text).await.unwrap();
        }

        let mut profile = ProfileStore::new();
        profile.update_from_text("keep it brief");

        let router = MemoryRouter::new(&context, &retrieval, &profile, 2);
        let memories = router.collect_memories("beta").await.unwrap();

        assert_eq!(memories.context, vec![Turn::new("Hi", "Hello")]);
        assert_eq!(memories.retrieval.len(), 2);
        assert_eq!(memories.retrieval[0], "beta");
        assert_eq!(memories.profile, "User style: concise.");
    }

    #[tokio::test]
    async fn does_not_mutate_stores() {
        let mut context = BoundedContextStore::new(2).unwrap();
        context.add_turn("u", "a");
        let mut retrieval = hash_store();
        retrieval.add_memory("m").await.unwrap();
        let profile = ProfileStore::new();

        let router = MemoryRouter::new(&context, &retrieval, &profile, 3);
        let first = router.collect_memories("m").await.unwrap();
        let second = router.collect_memories("m").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(context.len(), 1);
        assert_eq!(retrieval.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_survives_later_writes() {
        let mut context = BoundedContextStore::new(1).unwrap();
        context.add_turn("before", "reply");
        let retrieval = hash_store();
        let mut profile = ProfileStore::new();

        let memories = MemoryRouter::new(&context, &retrieval, &profile, 3)
            .collect_memories("q")
            .await
            .unwrap();

        context.add_turn("after", "reply");
        profile.update_from_text("I like formal replies");

        assert_eq!(memories.context, vec![Turn::new("before", "reply")]);
        assert_eq!(memories.profile, "");
    }

    #[tokio::test]
    async fn retrieval_failure_propagates() {
        let context = BoundedContextStore::new(1).unwrap();
        let mut retrieval = VectorMemoryStore::new(Arc::new(FailsOnBoom(HashEmbedder::default())));
        retrieval.add_memory("stored").await.unwrap();
        let profile = ProfileStore::new();

        let router = MemoryRouter::new(&context, &retrieval, &profile, 1);
        assert!(router.collect_memories("stored").await.is_ok());
        assert_eq!(
            router.collect_memories("boom").await.unwrap_err(),
            MemoryError::EmbeddingFailed("quota exhausted".into())
        );
    }
}
