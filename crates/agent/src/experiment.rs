//! The experiment loop.
//!
//! For each query: **assemble** messages from the session's memory →
//! **generate** a reply → **record** the exchange back into memory.
//! Model failures arrive in-band as text and are recorded like any reply;
//! memory failures abort the run.

use crate::session::MemorySession;
use chrono::{DateTime, Utc};
use memtier_config::AppConfig;
use memtier_core::error::Result;
use memtier_core::memory::Embedder;
use memtier_core::message::Message;
use memtier_core::mode::MemoryMode;
use memtier_providers::LlmClient;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Record of one completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnLog {
    /// 1-based position in the run.
    pub index: usize,
    pub user: String,
    pub assistant: String,
    /// Exactly what was sent to the model.
    pub messages_sent: Vec<Message>,
    pub timestamp: DateTime<Utc>,
}

pub struct Experiment {
    session: MemorySession,
    llm: LlmClient,
    turns_run: usize,
}

impl Experiment {
    pub fn new(session: MemorySession, llm: LlmClient) -> Self {
        Self {
            session,
            llm,
            turns_run: 0,
        }
    }

    /// Build a fresh session from configuration.
    ///
    /// Fails with `UnsupportedMode` for an unknown mode string and with
    /// `InvalidConfiguration` for out-of-range store sizes.
    pub fn from_config(config: &AppConfig, embedder: Arc<dyn Embedder>, llm: LlmClient) -> Result<Self> {
        let mode: MemoryMode = config.experiment.mode()?;
        let session = MemorySession::from_config(&config.memory, mode, embedder)?;
        Ok(Self::new(session, llm))
    }

    pub fn session(&self) -> &MemorySession {
        &self.session
    }

    pub fn mode(&self) -> MemoryMode {
        self.session.mode()
    }

    /// Run one query through the assemble → generate → record cycle.
    pub async fn run_turn(&mut self, query: &str) -> Result<TurnLog> {
        let messages = self.session.build_messages(query).await?;
        let reply = self.llm.generate(&messages).await;

        if memtier_providers::is_error_reply(&reply) {
            warn!(turn = self.turns_run + 1, "Model call failed, recording error text");
        }

        self.session.record_turn(query, &reply).await?;
        self.turns_run += 1;

        info!(
            turn = self.turns_run,
            mode = %self.session.mode(),
            messages = messages.len(),
            "Turn complete"
        );

        Ok(TurnLog {
            index: self.turns_run,
            user: query.to_string(),
            assistant: reply,
            messages_sent: messages,
            timestamp: Utc::now(),
        })
    }

    /// Run every query in order, returning the transcript.
    pub async fn run<I, S>(&mut self, queries: I) -> Result<Vec<TurnLog>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut transcript = Vec::new();
        for query in queries {
            transcript.push(self.run_turn(query.as_ref()).await?);
        }
        Ok(transcript)
    }
}
