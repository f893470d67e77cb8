//! `memtier run`: drive a multi-turn experiment in one memory mode.

use memtier_agent::{Experiment, TurnLog};
use memtier_config::{AppConfig, EmbeddingKind};
use memtier_core::memory::Embedder;
use memtier_core::mode::MemoryMode;
use memtier_core::provider::Provider;
use memtier_memory::{HashEmbedder, ProviderEmbedder};
use memtier_providers::{LlmClient, OpenAiCompatProvider};
use std::sync::Arc;

pub async fn run(
    mode: Option<String>,
    queries: Vec<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(mode) = mode {
        config.experiment.mode = mode;
    }
    if !queries.is_empty() {
        config.experiment.queries = queries;
    }

    // Check for API key early
    if config.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    MEMTIER_API_KEY      (generic)");
        eprintln!("    OPENROUTER_API_KEY   (recommended)");
        eprintln!("    OPENAI_API_KEY       (for OpenAI direct)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider: Arc<dyn Provider> = Arc::new(OpenAiCompatProvider::from_config(&config)?);
    let embedder = build_embedder(&config, provider.clone())?;
    let llm = LlmClient::new(provider, config.model.clone())
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

    let mut experiment = Experiment::from_config(&config, embedder, llm)?;
    println!("Running experiment in mode: {}", experiment.mode());

    let mut transcript = Vec::with_capacity(config.experiment.queries.len());
    for query in &config.experiment.queries {
        let log = experiment.run_turn(query).await?;
        print_turn(&log);
        transcript.push(log);
    }

    if json {
        println!();
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    }

    Ok(())
}

/// Pick the vector store's embedder from `[memory]`.
pub fn build_embedder(
    config: &AppConfig,
    provider: Arc<dyn Provider>,
) -> Result<Arc<dyn Embedder>, Box<dyn std::error::Error>> {
    Ok(match config.memory.embedding {
        EmbeddingKind::Hash => Arc::new(HashEmbedder::new(config.memory.embedding_dimension)?),
        EmbeddingKind::Provider => Arc::new(ProviderEmbedder::new(
            provider,
            config.memory.embedding_model.clone(),
        )),
    })
}

fn print_turn(log: &TurnLog) {
    println!();
    println!("Turn {}", log.index);
    println!("User: {}", log.user);
    println!("Assistant: {}", log.assistant);
}

pub fn modes() {
    for mode in MemoryMode::ALL {
        let description = match mode {
            MemoryMode::NoMemory => "query only, nothing remembered",
            MemoryMode::Context => "replay the most recent turns",
            MemoryMode::Retrieval => "inject the most similar past exchanges",
            MemoryMode::Hierarchical => "profile + retrieval + recent turns",
        };
        println!("  {:<14} {description}", mode.as_str());
    }
}
