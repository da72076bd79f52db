use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use glider::config::AppConfig;
use glider::hotkeys::FireMode;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = AppConfig::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", AppConfig::path()?.display());
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let path = AppConfig::path()?;
            let mut config = AppConfig::load_or_default();
            set(&mut config, &key, &value)?;
            config.save(&path)?;
            println!("{} {key} = {value}", "Updated".green());
            Ok(())
        }
    }
}

fn set(config: &mut AppConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "window.width" => {
            config.window.width = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid width: {value}. Must be a positive integer."))?;
        }
        "window.height" => {
            config.window.height = value.parse().map_err(|_| {
                anyhow::anyhow!("Invalid height: {value}. Must be a positive integer.")
            })?;
        }
        "window.fullscreen" => {
            config.window.fullscreen = match value {
                "true" => true,
                "false" => false,
                _ => anyhow::bail!("Invalid fullscreen: {value}. Must be 'true' or 'false'."),
            };
        }
        "slides.default_directory" => {
            config.slides.default_directory = value.to_string();
        }
        "hotkeys.fire_mode" => {
            config.hotkeys.fire_mode = match value {
                "level" => FireMode::Level,
                "edge" => FireMode::Edge,
                _ => anyhow::bail!("Invalid fire_mode: {value}. Must be 'level' or 'edge'."),
            };
        }
        _ => anyhow::bail!(
            "Unknown config key: {key}. Valid keys: window.width, window.height, \
             window.fullscreen, slides.default_directory, hotkeys.fire_mode"
        ),
    }
    Ok(())
}
