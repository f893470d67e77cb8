//! Memory modes: which stores feed the prompt and receive write-back.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How much memory a session brings to each query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryMode {
    /// The query alone.
    NoMemory,
    /// Recent turns only.
    Context,
    /// Similarity-retrieved texts only.
    Retrieval,
    /// Profile, retrieval and recent turns together.
    Hierarchical,
}

impl MemoryMode {
    pub const ALL: [MemoryMode; 4] = [
        MemoryMode::NoMemory,
        MemoryMode::Context,
        MemoryMode::Retrieval,
        MemoryMode::Hierarchical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryMode::NoMemory => "no_memory",
            MemoryMode::Context => "context",
            MemoryMode::Retrieval => "retrieval",
            MemoryMode::Hierarchical => "hierarchical",
        }
    }

    pub fn uses_context(&self) -> bool {
        matches!(self, MemoryMode::Context | MemoryMode::Hierarchical)
    }

    pub fn uses_retrieval(&self) -> bool {
        matches!(self, MemoryMode::Retrieval | MemoryMode::Hierarchical)
    }

    pub fn uses_profile(&self) -> bool {
        matches!(self, MemoryMode::Hierarchical)
    }
}

impl std::fmt::Display for MemoryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnsupportedMode(s.to_string()))
    }
}
