//! Message assembly: renders aggregated memory plus the query into the
//! ordered message sequence sent to the model.
//!
//! # Ordering
//!
//! 1. Profile prompt as one `system` message (if non-empty)
//! 2. Retrieved texts as one bulleted `system` message (if any)
//! 3. Each context turn: `user` then `assistant`, empty sides skipped
//! 4. The current query as the final `user` message, always
//!
//! No re-ranking, deduplication, or truncation happens here. Identical
//! inputs always produce identical output.

use memtier_core::memory::{AggregatedMemory, Turn};
use memtier_core::message::Message;

/// Header line of the retrieved-memories system message.
pub const RETRIEVAL_HEADER: &str = "Relevant memories:";

/// The message assembler. Stateless; create one and reuse it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageAssembler;

impl MessageAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble from individual memory snapshots.
    pub fn build_messages(
        &self,
        context_turns: &[Turn],
        retrieved_texts: &[String],
        profile_prompt: &str,
        user_query: &str,
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(3 + context_turns.len() * 2);

        if !profile_prompt.is_empty() {
            messages.push(Message::system(profile_prompt));
        }

        if !retrieved_texts.is_empty() {
            messages.push(Message::system(render_retrieved(retrieved_texts)));
        }

        for turn in context_turns {
            if !turn.user.is_empty() {
                messages.push(Message::user(turn.user.as_str()));
            }
            if !turn.assistant.is_empty() {
                messages.push(Message::assistant(turn.assistant.as_str()));
            }
        }

        messages.push(Message::user(user_query));
        messages
    }

    /// Assemble from a router snapshot.
    pub fn assemble(&self, memories: &AggregatedMemory, user_query: &str) -> Vec<Message> {
        self.build_messages(
            &memories.context,
            &memories.retrieval,
            &memories.profile,
            user_query,
        )
    }
}

fn render_retrieved(texts: &[String]) -> String {
    let bullets: Vec<String> = texts.iter().map(|text| format!("- {text}")).collect();
    format!("{RETRIEVAL_HEADER}\n{}", bullets.join("\n"))
}
