//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, path: &Path, quiet: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_from(path);
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            if content.trim().is_empty() {
                println!("# No settings in {}", path.display());
            } else {
                print!("{}", content);
            }
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            if path.exists() {
                if !quiet {
                    eprintln!("Config file already exists: {}", path.display());
                }
                return Ok(());
            }
            let config = Config {
                format: Some("text".to_string()),
                ..Config::default()
            };
            config.save_to(path)?;
            if !quiet {
                eprintln!("Created config file: {}", path.display());
            }
        }
    }
    Ok(())
}
