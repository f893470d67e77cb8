//! Embedding implementations for the vector store.
//!
//! - [`HashEmbedder`]: deterministic, offline, character-code bucketing
//! - [`ProviderEmbedder`]: delegates to a provider's embedding endpoint

use async_trait::async_trait;
use memtier_core::error::MemoryError;
use memtier_core::memory::Embedder;
use memtier_core::provider::{EmbeddingRequest, Provider};
use std::sync::Arc;
use tracing::debug;

/// Deterministic fallback embedding.
///
/// Each character's code point is added to bucket `index % dimension`, and
/// the result is L2-normalized. Identical text always yields an identical
/// vector; it carries no semantics.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub const DEFAULT_DIMENSION: usize = 64;

    pub fn new(dimension: usize) -> Result<Self, MemoryError> {
        if dimension == 0 {
            return Err(MemoryError::InvalidConfiguration(
                "embedding dimension must be a positive integer".into(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The synchronous core of [`Embedder::embed`].
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for (idx, ch) in text.chars().enumerate() {
            vector[idx % self.dimension] += ch as u32 as f32;
        }
        normalize(&mut vector);
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dimension: Self::DEFAULT_DIMENSION,
        }
    }
}

/// Scale to unit length in place. Zero vectors stay zero.
fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        Ok(self.embed_text(text))
    }
}

/// Embeds through a [`Provider`]'s embedding endpoint.
pub struct ProviderEmbedder {
    provider: Arc<dyn Provider>,
    model: String,
}

impl ProviderEmbedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for ProviderEmbedder {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, MemoryError> {
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: vec![text.to_string()],
            })
            .await
            .map_err(|e| MemoryError::EmbeddingFailed(e.to_string()))?;

        let embedding = response.embeddings.into_iter().next().ok_or_else(|| {
            MemoryError::EmbeddingFailed(format!("{} returned no embedding", self.provider.name()))
        })?;

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            dimension = embedding.len(),
            "Embedding generated"
        );
        Ok(embedding)
    }
}
