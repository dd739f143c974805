//! ReelClaw CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Write a starter config file
//! - `chat`    — Interactive chat or single-message mode
//! - `doctor`  — Diagnose configuration and collaborator health

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "reelclaw",
    about = "ReelClaw — a conversational movie assistant",
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
    /// Write a starter configuration file
    Onboard,

    /// Chat with the movie assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Reply persona: casual or critic
        #[arg(short, long)]
        persona: Option<String>,

        /// Ingest a document (extracted text) before the first turn
        #[arg(short, long)]
        document: Option<PathBuf>,
    },

    /// Diagnose configuration and collaborator health
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    match cli.command {
        Commands::Onboard => commands::onboard::run()?,
        Commands::Chat {
            message,
            persona,
            document,
        } => commands::chat::run(message, persona, document).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
