//! Health command implementation.

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::setup::GlobalOptions;

/// Execute the health command.
pub async fn execute(global: &GlobalOptions, json_output: bool) -> Result<()> {
    let config = global.load_config()?;
    let client = global.client(&config)?;
    let result = client.health().await;

    if json_output {
        let status = json!({
            "endpoint": client.endpoint(),
            "status": if result.is_ok() { "ok" } else { "unreachable" },
            "error": result.as_ref().err().map(ToString::to_string),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    }

    match result {
        Ok(()) => {
            if !json_output {
                println!("{} {} is healthy", "✓".green(), client.endpoint().cyan());
            }
            Ok(())
        }
        Err(e) => anyhow::bail!("Generation service at {} is unavailable: {}", client.endpoint(), e),
    }
}
