//! Error types for the memtier domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! The memory subsystem raises; the model-completion client reports
//! failures in-band instead (see `memtier_providers::LlmClient`).

use thiserror::Error;

/// The top-level error type for all memtier operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Memory errors ---
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Mode selection ---
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Memory errors ---

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MemoryError {
    /// A store was constructed with an out-of-range parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Embedding generation failed: {0}")]
    EmbeddingFailed(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}
