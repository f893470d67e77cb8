//! Prompt assembly and the memory-driven conversation loop.
//!
//! 1. **Assemble** messages from a [`MemorySession`] (profile, retrieval,
//!    recent turns, query, in that order)
//! 2. **Generate** a reply through [`LlmClient`](memtier_providers::LlmClient)
//! 3. **Record** the exchange into whichever stores the mode uses

pub mod assembler;
pub mod experiment;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use assembler::{MessageAssembler, RETRIEVAL_HEADER};
pub use experiment::{Experiment, TurnLog};
pub use session::{render_exchange, MemorySession};
