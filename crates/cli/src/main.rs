//! Docstash CLI — the main entry point.
//!
//! Commands:
//! - `serve`  — Start the HTTP API server
//! - `import` — Batch-import documents from a JSON or CSV file
//! - `status` — Show configuration and store status

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "docstash",
    about = "Docstash — a minimal record-keeping backend with LLM chat",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to ./docstash.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Batch-import documents from a JSON array or CSV file
    Import {
        /// The file to import
        file: PathBuf,

        /// Input format; inferred from the file extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<commands::import::Format>,
    },

    /// Show configuration and store status
    Status,
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
        .init();

    let config = match cli.config {
        Some(ref path) => docstash_config::AppConfig::load_from(path)
            .map_err(|e| format!("Failed to load config: {e}"))?,
        None => docstash_config::AppConfig::load()
            .map_err(|e| format!("Failed to load config: {e}"))?,
    };

    match cli.command {
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Import { file, format } => commands::import::run(config, file, format).await?,
        Commands::Status => commands::status::run(config).await?,
    }

    Ok(())
}
