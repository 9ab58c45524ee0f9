//! Math Tutor CLI
//!
//! Entry point for the `tutor` command-line tool. Runs the HTTP backend or
//! the one-shot document ingestion job.

mod commands;

use clap::{Parser, Subcommand};
use commands::{IngestCommand, ServeCommand};
use tutor_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Math Tutor - course backend with retrieval-augmented answers
#[derive(Parser, Debug)]
#[command(name = "tutor")]
#[command(about = "Math tutoring backend with retrieval-augmented answers", long_about = None)]
#[command(version)]
struct Cli {
    /// Bind address for the HTTP server
    #[arg(short, long, global = true, env = "TUTOR_BIND")]
    bind: Option<String>,

    /// Path to the embeddings database
    #[arg(short, long, global = true, env = "TUTOR_DATABASE")]
    database: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "TUTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeCommand),

    /// Ingest documents into the embeddings store
    Ingest(IngestCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment and config file
    let config = AppConfig::load(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.bind,
        cli.database,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Math Tutor CLI starting");
    tracing::debug!("Database: {:?}", config.database);
    tracing::debug!("Chat model: {}", config.chat.model);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ingest(_) => "ingest",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Ingest(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
