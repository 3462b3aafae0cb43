//! `validate` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ValidateArgs;

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            if args.json {
                let result = serde_json::json!({
                    "valid": true,
                    "config": args.config.display().to_string(),
                    "executor_mode": format!("{:?}", blueprint.executor.mode),
                    "sinks": blueprint.sinks.len(),
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                info!(config = %args.config.display(), "Configuration is valid");
                println!("OK: {}", args.config.display());
            }
            Ok(())
        }
        Err(e) => {
            if args.json {
                let result = serde_json::json!({
                    "valid": false,
                    "config": args.config.display().to_string(),
                    "error": e.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Err(e).with_context(|| format!("Invalid configuration: {}", args.config.display()))
        }
    }
}
