//! LLM provider implementations for memtier.
//!
//! All providers implement the `memtier_core::Provider` trait. [`LlmClient`]
//! wraps one and reports failures in-band as text.

pub mod client;
pub mod openai_compat;

pub use client::{is_error_reply, LlmClient, ERROR_MARKER};
pub use openai_compat::OpenAiCompatProvider;
