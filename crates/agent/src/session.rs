//! Memory session: one isolated set of stores driven by a [`MemoryMode`].
//!
//! Each logical conversation gets its own session; stores are never shared
//! between sessions. Writes take `&mut self`, so concurrent mutation of one
//! session is ruled out at compile time.

use crate::assembler::MessageAssembler;
use memtier_config::MemoryConfig;
use memtier_core::error::MemoryError;
use memtier_core::memory::Embedder;
use memtier_core::message::Message;
use memtier_core::mode::MemoryMode;
use memtier_memory::{BoundedContextStore, MemoryRouter, ProfileStore, VectorMemoryStore};
use std::sync::Arc;
use tracing::debug;

/// Text stored in the vector store for one exchange.
pub fn render_exchange(query: &str, reply: &str) -> String {
    format!("User: {query}\nAssistant: {reply}")
}

#[derive(Debug)]
pub struct MemorySession {
    mode: MemoryMode,
    context: BoundedContextStore,
    retrieval: VectorMemoryStore,
    profile: ProfileStore,
    retrieval_k: usize,
    assembler: MessageAssembler,
}

impl MemorySession {
    /// Fresh, empty stores.
    ///
    /// Fails with [`MemoryError::InvalidConfiguration`] when
    /// `context_capacity` is zero.
    pub fn new(
        mode: MemoryMode,
        context_capacity: usize,
        retrieval_k: usize,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, MemoryError> {
        Ok(Self {
            mode,
            context: BoundedContextStore::new(context_capacity)?,
            retrieval: VectorMemoryStore::new(embedder),
            profile: ProfileStore::new(),
            retrieval_k,
            assembler: MessageAssembler::new(),
        })
    }

    pub fn from_config(
        config: &MemoryConfig,
        mode: MemoryMode,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, MemoryError> {
        Self::new(mode, config.context_capacity, config.retrieval_k, embedder)
    }

    pub fn mode(&self) -> MemoryMode {
        self.mode
    }

    /// A router over this session's stores.
    pub fn router(&self) -> MemoryRouter<'_> {
        MemoryRouter::new(&self.context, &self.retrieval, &self.profile, self.retrieval_k)
    }

    /// Messages for `query` drawing only on the stores the mode uses.
    pub async fn build_messages(&self, query: &str) -> Result<Vec<Message>, MemoryError> {
        let messages = match self.mode {
            MemoryMode::NoMemory => vec![Message::user(query)],
            MemoryMode::Context => {
                self.assembler
                    .build_messages(&self.context.get_context(), &[], "", query)
            }
            MemoryMode::Retrieval => {
                let retrieved = self.retrieval.retrieve(query, self.retrieval_k).await?;
                self.assembler.build_messages(&[], &retrieved, "", query)
            }
            MemoryMode::Hierarchical => {
                let memories = self.router().collect_memories(query).await?;
                self.assembler.assemble(&memories, query)
            }
        };

        debug!(mode = %self.mode, messages = messages.len(), "Messages assembled");
        Ok(messages)
    }

    /// Write a finished exchange into every store the mode uses.
    ///
    /// The vector write goes first: if embedding fails, no store changes.
    pub async fn record_turn(&mut self, query: &str, reply: &str) -> Result<(), MemoryError> {
        if self.mode.uses_retrieval() {
            self.retrieval.add_memory(render_exchange(query, reply)).await?;
        }
        if self.mode.uses_context() {
            self.context.add_turn(query, reply);
        }
        if self.mode.uses_profile() {
            self.profile.update_from_text(query);
        }
        Ok(())
    }

    pub fn context(&self) -> &BoundedContextStore {
        &self.context
    }

    pub fn retrieval(&self) -> &VectorMemoryStore {
        &self.retrieval
    }

    pub fn profile(&self) -> &ProfileStore {
        &self.profile
    }
}
