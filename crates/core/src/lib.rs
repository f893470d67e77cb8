//! # memtier Core
//!
//! Domain types, capability traits, and error definitions for the memtier
//! memory subsystem. Every other crate depends inward on this one.
//!
//! ## Design Philosophy
//!
//! External capabilities (embedding, model completion) are traits here.
//! Implementations live in their respective crates, so a store can be built
//! against a deterministic fallback in tests and a real model in production.

pub mod error;
pub mod memory;
pub mod message;
pub mod mode;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, MemoryError, ProviderError, Result};
pub use memory::{AggregatedMemory, Embedder, MemoryRecord, Turn};
pub use message::{Message, Role};
pub use mode::MemoryMode;
pub use provider::{Provider, ProviderRequest, ProviderResponse};
