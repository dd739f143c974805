//! `reelclaw doctor` — diagnose configuration and collaborator health.

use reelclaw_config::AppConfig;
use reelclaw_core::Provider;
use reelclaw_metadata::{MovieCatalog, TmdbCatalog};
use std::time::Duration;

pub async fn run() -> anyhow::Result<()> {
    println!();
    println!("  ReelClaw Doctor");
    println!("  ───────────────");

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  [ok]   config file: {}", config_path.display());
    } else {
        println!("  [--]   no config file (defaults in effect) — run `reelclaw onboard`");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  [ok]   config valid");
            config
        }
        Err(e) => {
            println!("  [FAIL] config invalid: {e}");
            return Ok(());
        }
    };

    // Provider
    match &config.provider.api_key {
        Some(_) => match reelclaw_providers::build_from_settings(&config.provider) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  [ok]   provider reachable ({})", config.provider.base_url),
                Ok(false) => println!("  [warn] provider responded unhealthy"),
                Err(e) => println!("  [FAIL] provider unreachable: {e}"),
            },
            Err(e) => println!("  [FAIL] provider setup: {e}"),
        },
        None => println!("  [FAIL] no provider API key (set GEMINI_API_KEY)"),
    }

    // Catalog
    match &config.catalog.api_key {
        Some(key) => {
            let catalog = TmdbCatalog::new(
                &config.catalog.base_url,
                &config.catalog.image_base_url,
                key.clone(),
                Duration::from_secs(config.catalog.request_timeout_secs),
            );
            match catalog {
                Ok(catalog) => match catalog.search("Alien").await {
                    Ok(Some(_)) => println!("  [ok]   catalog reachable ({})", catalog.name()),
                    Ok(None) => println!("  [warn] catalog reachable but returned no results"),
                    Err(e) => println!("  [FAIL] catalog unreachable: {e}"),
                },
                Err(e) => println!("  [FAIL] catalog setup: {e}"),
            }
        }
        None => println!("  [--]   no catalog API key — sample catalog will be used"),
    }

    println!();
    Ok(())
}
