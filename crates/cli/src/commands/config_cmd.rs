//! `memtier config`: Configuration management commands.

use memtier_config::AppConfig;

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed successfully");

            if config.api_key.is_none() {
                println!("   Warning: no API key set (set MEMTIER_API_KEY or OPENROUTER_API_KEY)");
            }

            println!();
            println!("   Provider:   {} ({})", config.provider.name, config.provider.base_url);
            println!("   Model:      {}", config.model);
            println!("   Mode:       {}", config.experiment.mode);
            println!("   Context:    {} turns", config.memory.context_capacity);
            println!("   Retrieval:  top {}", config.memory.retrieval_k);
            println!("   Embedding:  {:?}", config.memory.embedding);
            println!("   Queries:    {}", config.experiment.queries.len());
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    // Redact the key.
    let redacted = AppConfig {
        api_key: None,
        ..config
    };
    let toml_str = toml::to_string_pretty(&redacted)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path() {
    let config_path = AppConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
}
