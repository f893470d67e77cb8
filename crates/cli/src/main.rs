//! memtier CLI: the main entry point.
//!
//! Commands:
//! - `run`      Run a multi-turn experiment in one memory mode
//! - `modes`    List the available memory modes
//! - `config`   Show, validate, or locate the configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "memtier",
    about = "memtier: compare memory strategies for LLM conversations",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an experiment: feed queries to the model with memory
    Run {
        /// Memory mode: no_memory, context, retrieval, hierarchical
        #[arg(short, long)]
        mode: Option<String>,

        /// Query to send (repeatable; defaults to the configured queries)
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Print the full transcript as JSON after the run
        #[arg(long)]
        json: bool,
    },

    /// List available memory modes
    Modes,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            mode,
            queries,
            json,
        } => commands::run::run(mode, queries, json).await?,
        Commands::Modes => commands::run::modes(),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
            ConfigAction::Path => commands::config_cmd::path(),
        },
    }

    Ok(())
}
