use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;

mod catalog;
mod cli;
mod commands;
mod config;
mod controller;
mod render;

use cli::{Cli, Commands, OutputFormat};
use commands::list::ListArgs;
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel, verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agent-catalog")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("agent-catalog.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder.filter_level(match log_level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        });
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

/// Color only when configured and stdout is a terminal; NO_COLOR always wins
fn setup_color(config: &Config) {
    let enabled =
        config.display.color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
    colored::control::set_override(enabled);
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::List {
            source,
            filter,
            search,
            stagger_ms,
            format,
        } => commands::list::run(
            ListArgs {
                source: source.as_deref(),
                filter,
                search: search.as_deref(),
                stagger_ms,
                format: OutputFormat::resolve(format),
                quiet: cli.quiet,
            },
            &config,
        ),
        Commands::Show { id, source, format } => {
            commands::show::run(&id, source.as_deref(), OutputFormat::resolve(format), &config)
        }
        Commands::Browse { source } => commands::browse::run(source.as_deref(), &config),
        Commands::Status { source, format } => {
            commands::status::run(source.as_deref(), OutputFormat::resolve(format), &config)
        }
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with log level from config (or RUST_LOG env var)
    setup_logging(&config.log_level, cli.verbose).context("Failed to setup logging")?;
    setup_color(&config);

    info!("Starting agent-catalog with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
