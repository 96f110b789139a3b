//! Catalog status command
//!
//! Loads the catalog once and reports the totals shown in the status bar,
//! broken down by status.

use chrono::Local;
use colored::*;
use eyre::{Context, Result};
use serde::Serialize;

use crate::catalog::agent::{Agent, Status};
use crate::catalog::source::{DataSource, open_source};
use crate::cli::OutputFormat;
use crate::config::Config;

#[derive(Serialize)]
struct CatalogStatus {
    version: String,
    source: String,
    agent_count: usize,
    skipped: usize,
    by_status: Vec<StatusCount>,
    last_update: String,
}

#[derive(Serialize)]
struct StatusCount {
    status: Status,
    count: usize,
}

pub fn run(source: Option<&str>, format: OutputFormat, config: &Config) -> Result<()> {
    let location = config.source_or(source);
    let report = open_source(location)
        .load()
        .with_context(|| format!("Failed to load agents from {}", location))?;

    let status = CatalogStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: location.to_string(),
        agent_count: report.agents.len(),
        skipped: report.skipped.len(),
        by_status: count_by_status(&report.agents),
        last_update: Local::now().format("%H:%M:%S").to_string(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&status)?),
        OutputFormat::Text => print_text_status(&status),
    }

    Ok(())
}

fn count_by_status(agents: &[Agent]) -> Vec<StatusCount> {
    Status::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: agents.iter().filter(|a| a.status == *status).count(),
        })
        .collect()
}

fn print_text_status(status: &CatalogStatus) {
    println!("{}", "Agent Catalog Status".bold());
    println!();

    println!("  {:14} {}", "Version:".dimmed(), status.version);
    println!("  {:14} {}", "Source:".dimmed(), status.source);
    println!("  {:14} {}", "Last update:".dimmed(), status.last_update.cyan());
    println!();

    println!(
        "{} ({}):",
        "Agents".cyan(),
        format!("{} loaded", status.agent_count).dimmed()
    );
    for entry in &status.by_status {
        println!(
            "  {:14} {:>5}",
            entry.status.label(),
            entry.count.to_string().yellow()
        );
    }

    if status.skipped > 0 {
        println!();
        println!(
            "  {} {} malformed record(s) skipped",
            "⚠".yellow(),
            status.skipped
        );
    }
}
