//! Config command implementation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use wecreate_core::StudioConfig;

use super::types::ConfigCommand;
use crate::setup::GlobalOptions;

/// Execute the config command.
pub fn execute(global: &GlobalOptions, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show { json } => show(global, json),
        ConfigCommand::Path => {
            print_path("global", &StudioConfig::default_global_path());
            print_path("local", &StudioConfig::default_local_path());
            if let Some(explicit) = &global.config {
                print_path("explicit", explicit);
            }
            Ok(())
        }
        ConfigCommand::Init { global: use_global, force } => {
            let path = if use_global {
                StudioConfig::default_global_path()
            } else {
                StudioConfig::default_local_path()
            };
            init(&path, force)
        }
    }
}

fn show(global: &GlobalOptions, json: bool) -> Result<()> {
    let resolved = global.load_config()?.resolved().context("Invalid configuration")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        print!("{}", toml::to_string_pretty(&resolved).context("Failed to render configuration")?);
    }
    Ok(())
}

fn print_path(label: &str, path: &Path) {
    let status = if path.exists() { "found".green() } else { "missing".dimmed() };
    println!("{:<9} {} ({})", label, path.display(), status);
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    StudioConfig::default()
        .resolved()?
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
