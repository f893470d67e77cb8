//! Vector memory store and similarity utilities.
//!
//! Retrieval is an exact linear scan: every query embeds once and compares
//! against every stored vector, O(records × dimension).

use memtier_core::error::MemoryError;
use memtier_core::memory::{Embedder, MemoryRecord};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical direction, 0 = orthogonal,
/// -1 = opposite. Vectors of different lengths are compared over their
/// shared prefix. Any zero-norm (or empty) operand yields 0.0, as does a
/// non-finite result.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !similarity.is_finite() {
        return 0.0;
    }
    similarity as f32
}

/// A retrieved text with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredText {
    pub text: String,
    pub score: f32,
}

/// Rank records by cosine similarity to a query embedding.
///
/// Descending by score; equal scores keep insertion order.
pub fn rank_by_similarity(records: &[MemoryRecord], query_embedding: &[f32], limit: usize) -> Vec<ScoredText> {
    let mut scored: Vec<ScoredText> = records
        .iter()
        .map(|record| ScoredText {
            text: record.text.clone(),
            score: cosine_similarity(&record.embedding, query_embedding),
        })
        .collect();

    // `sort_by` is stable, which gives the insertion-order tie break.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Append-only store of texts and their embeddings.
pub struct VectorMemoryStore {
    embedder: Arc<dyn Embedder>,
    records: Vec<MemoryRecord>,
}

impl VectorMemoryStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            records: Vec::new(),
        }
    }

    /// Embed `text` once and append it. Duplicates are stored independently.
    pub async fn add_memory(&mut self, text: impl Into<String>) -> Result<(), MemoryError> {
        let text = text.into();
        let embedding = self.embedder.embed(&text).await?;
        self.records.push(MemoryRecord { text, embedding });
        debug!(
            embedder = self.embedder.name(),
            len = self.records.len(),
            "Memory record added"
        );
        Ok(())
    }

    /// The `k` stored texts most similar to `query`, most similar first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>, MemoryError> {
        Ok(self
            .retrieve_scored(query, k)
            .await?
            .into_iter()
            .map(|scored| scored.text)
            .collect())
    }

    /// Like [`retrieve`](Self::retrieve), keeping the similarity scores.
    ///
    /// Returns empty without calling the embedder when `k == 0` or the store
    /// is empty.
    pub async fn retrieve_scored(&self, query: &str, k: usize) -> Result<Vec<ScoredText>, MemoryError> {
        if k == 0 || self.records.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = rank_by_similarity(&self.records, &query_embedding, k);
        debug!(
            k,
            scanned = self.records.len(),
            returned = results.len(),
            "Vector retrieval complete"
        );
        Ok(results)
    }

    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Debug for VectorMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorMemoryStore")
            .field("embedder", &self.embedder.name())
            .field("records", &self.records.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Maps known texts to fixed vectors; unknown texts embed to zero.
    struct TableEmbedder {
        table: HashMap<&'static str, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl TableEmbedder {
        fn new(entries: &[(&'static str, Vec<f32>)]) -> Self {
            Self {
                table: entries.iter().cloned().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for TableEmbedder {
        fn name(&self) -> &str {
            "table"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.table.get(text).cloned().unwrap_or_else(|| vec![0.0, 0.0, 0.0]))
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, MemoryError> {
            Err(MemoryError::EmbeddingFailed("model offline".into()))
        }
    }

    fn hash_store() -> VectorMemoryStore {
        VectorMemoryStore::new(Arc::new(HashEmbedder::new(64).unwrap()))
    }

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = [0.3, -1.2, 4.0, 0.5];
        let b = [2.0, 0.1, -0.7, 1.5];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn cosine_known_value() {
        // [1,1] · [1,0] = 1, |[1,1]| = sqrt(2) → 1/sqrt(2)
        let sim = cosine_similarity(&[1.0, 1.0], &[1.0, 0.0]);
        assert!((sim - 0.7071).abs() < 0.001);
    }

    #[test]
    fn cosine_non_finite_is_zero() {
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[f32::INFINITY, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn nan_embedding_ranks_below_real_matches() {
        let embedder = TableEmbedder::new(&[
            ("corrupt", vec![f32::NAN, 0.0, 0.0]),
            ("match", vec![1.0, 0.0, 0.0]),
            ("query", vec![1.0, 0.0, 0.0]),
        ]);
        let mut store = VectorMemoryStore::new(Arc::new(embedder));
        store.add_memory("corrupt").await.unwrap();
        store.add_memory("match").await.unwrap();

        let scored = store.retrieve_scored("query", 2).await.unwrap();
        assert_eq!(scored[0].text, "match");
        assert_eq!(scored[1].score, 0.0);
    }

    #[test]
    fn cosine_mismatched_lengths_use_shared_prefix() {
        let sim = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 5.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn retrieve_ranks_by_similarity() {
        let embedder = TableEmbedder::new(&[
            ("orthogonal", vec![0.0, 1.0, 0.0]),
            ("identical", vec![1.0, 0.0, 0.0]),
            ("partial", vec![0.5, 0.5, 0.0]),
            ("query", vec![1.0, 0.0, 0.0]),
        ]);
        let mut store = VectorMemoryStore::new(Arc::new(embedder));
        store.add_memory("orthogonal").await.unwrap();
        store.add_memory("identical").await.unwrap();
        store.add_memory("partial").await.unwrap();

        let results = store.retrieve("query", 10).await.unwrap();
        assert_eq!(results, vec!["identical", "partial", "orthogonal"]);

        let scored = store.retrieve_scored("query", 10).await.unwrap();
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let embedder = TableEmbedder::new(&[
            ("first", vec![0.0, 1.0, 0.0]),
            ("second", vec![0.0, 2.0, 0.0]),
            ("third", vec![0.0, 4.0, 0.0]),
            ("query", vec![0.0, 1.0, 1.0]),
        ]);
        let mut store = VectorMemoryStore::new(Arc::new(embedder));
        for text in ["first", "second", "third"] {
            store.add_memory(text).await.unwrap();
        }

        let results = store.retrieve("query", 3).await.unwrap();
        assert_eq!(results, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn k_zero_and_empty_store_return_nothing_without_embedding() {
        let embedder = Arc::new(TableEmbedder::new(&[]));
        let mut store = VectorMemoryStore::new(embedder.clone());

        assert!(store.retrieve("anything", 3).await.unwrap().is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);

        store.add_memory("stored").await.unwrap();
        assert!(store.retrieve("anything", 0).await.unwrap().is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn k_larger_than_store_returns_all_ranked() {
        let mut store = hash_store();
        store.add_memory("User: I like tea").await.unwrap();
        store.add_memory("User: the weather is cold").await.unwrap();

        let results = store.retrieve("User: I like tea", 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], "User: I like tea");
    }

    #[tokio::test]
    async fn duplicates_are_independent_entries() {
        let mut store = hash_store();
        store.add_memory("same text").await.unwrap();
        store.add_memory("same text").await.unwrap();
        store.add_memory("something entirely different").await.unwrap();

        assert_eq!(store.len(), 3);
        let results = store.retrieve("same text", 2).await.unwrap();
        assert_eq!(results, vec!["same text", "same text"]);
    }

    #[tokio::test]
    async fn embeddings_are_computed_once_at_insertion() {
        let mut store = hash_store();
        store.add_memory("hello").await.unwrap();
        let before = store.records()[0].embedding.clone();
        store.retrieve("hello", 1).await.unwrap();
        assert_eq!(store.records()[0].embedding, before);
        assert_eq!(store.records().len(), store.len());
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let mut store = VectorMemoryStore::new(Arc::new(FailingEmbedder));
        let err = store.add_memory("text").await.unwrap_err();
        assert_eq!(err, MemoryError::EmbeddingFailed("model offline".into()));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn retrieval_failure_propagates() {
        let embedder = TableEmbedder::new(&[]);
        let mut store = VectorMemoryStore::new(Arc::new(embedder));
        store.add_memory("stored").await.unwrap();

        let store = VectorMemoryStore {
            embedder: Arc::new(FailingEmbedder),
            records: store.records,
        };
        assert!(matches!(
            store.retrieve("query", 1).await,
            Err(MemoryError::EmbeddingFailed(_))
        ));
    }
}
