use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Agent Catalog Configuration".bold());
            println!();

            println!("  source: {}", config.source);
            println!("  log_level: {}", config.log_level.as_filter());
            println!();

            println!("{}:", "display".cyan());
            println!("  stagger_ms: {}", config.display.stagger_ms);
            println!("  time_format: {}", config.display.time_format);
            println!("  notification_secs: {}", config.display.notification_secs);
            println!("  color: {}", config.display.color);
        }
    }

    Ok(())
}

fn get(key: &str, config: &Config) -> Result<()> {
    let value = lookup(key, config).ok_or_else(|| eyre::eyre!("Unknown config key: {}", key))?;
    println!("{}", value);
    Ok(())
}

fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "source" => Some(config.source.clone()),
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        "display.stagger_ms" => Some(config.display.stagger_ms.to_string()),
        "display.time_format" => Some(config.display.time_format.clone()),
        "display.notification_secs" => Some(config.display.notification_secs.to_string()),
        "display.color" => Some(config.display.color.to_string()),
        _ => None,
    }
}
