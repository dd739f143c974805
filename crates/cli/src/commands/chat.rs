//! `reelclaw chat` — interactive or single-message chat mode.

use anyhow::Context;
use reelclaw_agent::{Session, SessionManager};
use reelclaw_config::AppConfig;
use reelclaw_core::event::EventBus;
use reelclaw_core::message::SessionId;
use reelclaw_core::Persona;
use reelclaw_metadata::{MovieCatalog, StaticCatalog, TmdbCatalog};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(
    message: Option<String>,
    persona: Option<String>,
    document: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    // Check for an API key early — give a clear error
    if config.provider.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No language-model API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    export GEMINI_API_KEY='...'     (recommended)");
        eprintln!("    export REELCLAW_API_KEY='...'   (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        eprintln!("  Get a Gemini key at: https://aistudio.google.com/app/apikey");
        eprintln!();
        anyhow::bail!("No API key found. See above for setup instructions.");
    }

    let provider = reelclaw_providers::build_from_settings(&config.provider)
        .map_err(|e| anyhow::anyhow!("Failed to build provider: {e}"))?;

    // Without a catalog key, fall back to the built-in sample catalog so
    // the assistant still works offline.
    let catalog: Arc<dyn MovieCatalog> = match &config.catalog.api_key {
        Some(key) => Arc::new(
            TmdbCatalog::new(
                &config.catalog.base_url,
                &config.catalog.image_base_url,
                key.clone(),
                Duration::from_secs(config.catalog.request_timeout_secs),
            )
            .map_err(|e| anyhow::anyhow!("Failed to build catalog client: {e}"))?,
        ),
        None => {
            eprintln!("  note: no TMDB_API_KEY set — using the built-in sample catalog");
            Arc::new(StaticCatalog::sample())
        }
    };

    let chat_model = config.provider.chat_model.clone();
    let event_bus = Arc::new(EventBus::default());
    let manager = SessionManager::new(provider, catalog, config, event_bus);
    let orchestrator = manager.orchestrator();
    let session = manager.get_or_create(&SessionId::new()).await;

    if let Some(name) = persona {
        let persona =
            Persona::from_str(&name).map_err(|e| anyhow::anyhow!("Invalid persona: {e}"))?;
        session.set_persona(persona).await;
    }

    if let Some(path) = document {
        ingest_file(&session, &path).await?;
    }

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let outcome = orchestrator.process_turn(&session, &msg).await;
        eprint!("\r              \r");
        println!("{}", outcome.reply);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        ReelClaw — Interactive Mode           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Model:    {chat_model}");
    println!("  Persona:  {}", session.persona().await);
    println!();
    println!("  Commands: /persona <casual|critic>, /upload <file>,");
    println!("            /export <file>, /import <file>, /reset, exit");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        if let Some(rest) = line.strip_prefix('/') {
            if let Err(e) = handle_command(&session, rest).await {
                eprintln!("  error: {e}");
            }
            continue;
        }

        eprint!("  ...");
        let outcome = orchestrator.process_turn(&session, line).await;
        eprint!("\r     \r");
        println!();
        for reply_line in outcome.reply.lines() {
            println!("  ReelClaw > {reply_line}");
        }
        println!();
    }

    manager.end_session(session.id()).await;
    println!("  Bye!");
    Ok(())
}

/// Handle a `/command` in the interactive loop. These map the sidebar
/// actions of a chat UI: persona switching, document upload, watchlist
/// import/export, and conversation reset.
async fn handle_command(session: &Session, input: &str) -> anyhow::Result<()> {
    let (cmd, arg) = match input.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (input, ""),
    };

    match cmd {
        "persona" => {
            let persona =
                Persona::from_str(arg).map_err(|e| anyhow::anyhow!("{e}"))?;
            session.set_persona(persona).await;
            println!("  persona set to {persona}");
        }
        "upload" => {
            anyhow::ensure!(!arg.is_empty(), "usage: /upload <file>");
            ingest_file(session, Path::new(arg)).await?;
        }
        "export" => {
            anyhow::ensure!(!arg.is_empty(), "usage: /export <file>");
            let serialized = session
                .watchlist()
                .export()
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            std::fs::write(arg, serialized).with_context(|| format!("writing {arg}"))?;
            println!("  watchlist exported to {arg}");
        }
        "import" => {
            anyhow::ensure!(!arg.is_empty(), "usage: /import <file>");
            let serialized =
                std::fs::read_to_string(arg).with_context(|| format!("reading {arg}"))?;
            let count = session
                .watchlist()
                .import(&serialized)
                .await
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            println!("  watchlist imported: {count} items");
        }
        "reset" => {
            session.reset_conversation().await;
            println!("  conversation cleared");
        }
        other => anyhow::bail!("unknown command '/{other}'"),
    }
    Ok(())
}

async fn ingest_file(session: &Session, path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    eprint!("  Indexing document...");
    let chunks = session
        .ingest_document(&bytes, name)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to ingest document: {e}"))?;
    eprint!("\r                      \r");
    println!("  '{name}' indexed ({chunks} chunks) — ask away.");
    Ok(())
}
