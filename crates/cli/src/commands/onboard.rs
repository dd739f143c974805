//! `reelclaw onboard` — write a starter configuration file.

use anyhow::Context;
use reelclaw_config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("  Config already exists at {}", config_path.display());
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating {}", config_dir.display()))?;
    std::fs::write(&config_path, AppConfig::default_toml())
        .with_context(|| format!("writing {}", config_path.display()))?;

    println!("  Wrote starter config to {}", config_path.display());
    println!();
    println!("  Next steps:");
    println!("    export GEMINI_API_KEY=...   # language model");
    println!("    export TMDB_API_KEY=...     # movie catalog (optional; a built-in");
    println!("                                # sample catalog is used without it)");
    println!("    reelclaw chat");
    Ok(())
}
