//! Configuration loading, validation, and management for memtier.
//!
//! Loads configuration from `~/.memtier/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use memtier_core::MemoryMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.memtier/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the chat/embedding endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per reply (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Endpoint configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Memory store configuration
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Experiment driver configuration
    #[serde(default)]
    pub experiment: ExperimentConfig,
}

fn default_model() -> String {
    "nex-agi/deepseek-v3.1-nex-n1:free".into()
}
fn default_temperature() -> f32 {
    0.7
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("provider", &self.provider)
            .field("memory", &self.memory)
            .field("experiment", &self.experiment)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_provider_name() -> String {
    "openrouter".into()
}
fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
        }
    }
}

/// Which `Embedder` the vector store is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingKind {
    /// Deterministic character-code fallback, no network.
    #[default]
    Hash,
    /// The configured provider's `/embeddings` endpoint.
    Provider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Turns kept by the bounded context store
    #[serde(default = "default_context_capacity")]
    pub context_capacity: usize,

    /// Texts returned per retrieval
    #[serde(default = "default_retrieval_k")]
    pub retrieval_k: usize,

    #[serde(default)]
    pub embedding: EmbeddingKind,

    /// Dimensionality of the hash embedder
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Model name for provider embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_context_capacity() -> usize {
    4
}
fn default_retrieval_k() -> usize {
    3
}
fn default_embedding_dimension() -> usize {
    64
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            context_capacity: default_context_capacity(),
            retrieval_k: default_retrieval_k(),
            embedding: EmbeddingKind::default(),
            embedding_dimension: default_embedding_dimension(),
            embedding_model: default_embedding_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// One of `no_memory`, `context`, `retrieval`, `hierarchical`
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Queries fed to the model in order
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,
}

fn default_mode() -> String {
    MemoryMode::Hierarchical.as_str().into()
}
fn default_queries() -> Vec<String> {
    vec![
        "Hi, I like concise answers.".into(),
        "Remind me what I said about answer style.".into(),
        "Give me a short summary of our chat.".into(),
    ]
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            queries: default_queries(),
        }
    }
}

impl ExperimentConfig {
    /// Parse the configured mode string.
    pub fn mode(&self) -> memtier_core::Result<MemoryMode> {
        self.mode.parse()
    }
}

impl AppConfig {
    /// Load configuration from the default path with env overrides.
    ///
    /// Priority: env vars > config file > defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if self.api_key.is_none() {
            self.api_key = std::env::var("MEMTIER_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("MEMTIER_MODEL") {
            self.model = model;
        }

        if let Ok(mode) = std::env::var("MEMTIER_MODE") {
            self.experiment.mode = mode;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".memtier")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.memory.context_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "memory.context_capacity must be > 0".into(),
            ));
        }

        if self.memory.embedding_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "memory.embedding_dimension must be > 0".into(),
            ));
        }

        self.experiment
            .mode()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            provider: ProviderConfig::default(),
            memory: MemoryConfig::default(),
            experiment: ExperimentConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
