//! Bounded context store: a fixed-capacity FIFO window of recent turns.

use memtier_core::error::MemoryError;
use memtier_core::memory::Turn;
use std::collections::VecDeque;
use tracing::debug;

/// Keeps the last `capacity` turns, evicting the oldest first.
#[derive(Debug, Clone)]
pub struct BoundedContextStore {
    capacity: usize,
    turns: VecDeque<Turn>,
}

impl BoundedContextStore {
    /// Create a store holding at most `capacity` turns.
    ///
    /// Fails with [`MemoryError::InvalidConfiguration`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, MemoryError> {
        if capacity == 0 {
            return Err(MemoryError::InvalidConfiguration(
                "context capacity must be a positive integer".into(),
            ));
        }
        Ok(Self {
            capacity,
            turns: VecDeque::with_capacity(capacity),
        })
    }

    /// Append a turn, evicting the oldest one when full.
    pub fn add_turn(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(Turn::new(user_text, assistant_text));
        debug!(len = self.turns.len(), capacity = self.capacity, "Context turn added");
    }

    /// Snapshot of the current turns, oldest first.
    pub fn get_context(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
