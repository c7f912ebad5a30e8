//! Config command - configuration management

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init {
            path,
            force,
            with_persona,
        } => init_config(path, force, with_persona).await,
    }
}

async fn init_config(path: PathBuf, force: bool, with_persona: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    fs::write(&path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    println!("Created config file: {}", path.display());

    if with_persona {
        let persona_path = path
            .parent()
            .map(|p| p.join("persona.yaml"))
            .unwrap_or_else(|| PathBuf::from("persona.yaml"));

        if persona_path.exists() && !force {
            anyhow::bail!(
                "Persona file already exists: {}. Use --force to overwrite.",
                persona_path.display()
            );
        }

        fs::write(&persona_path, AppConfig::example_persona_yaml()).with_context(|| {
            format!("Failed to write persona file: {}", persona_path.display())
        })?;

        println!("Created persona file: {}", persona_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. Edit the config file and persona to fit your account");
    println!("  2. Run 'memo-poster doctor' to validate your setup");
    println!("  3. Run 'memo-poster preview' to see today's post");
    println!("  4. Run 'memo-poster post --dry-run' to test a full run");

    Ok(())
}
