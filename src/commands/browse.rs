//! Interactive browsing
//!
//! Each input line is one event for the controller:
//!
//! ```text
//! filter <all|active|standby|maintenance>
//! search <text>        (no text clears the search)
//! select <id>
//! show <id>
//! reload
//! help
//! quit
//! ```

use colored::*;
use eyre::{Context, Result};
use std::io::{self, BufRead, Write};

use crate::catalog::filter::{StatusFilter, UiState};
use crate::catalog::source::{DataSource, open_source};
use crate::config::Config;
use crate::controller::{InteractionController, Phase};
use crate::render::Renderer;
use crate::render::effects;
use crate::render::terminal::{TerminalRenderer, terminal_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Filter(StatusFilter),
    Search(String),
    Select(String),
    Show(String),
    Reload,
    Help,
    Quit,
    Empty,
}

/// Parse one input line. Search text is kept as typed apart from the
/// line ending.
pub fn parse_line(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim_end_matches(['\n', '\r']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(BrowseCommand::Empty);
    }

    let (word, rest) = match trimmed.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    match word.to_lowercase().as_str() {
        "filter" | "f" => {
            let value = rest.trim();
            if value.is_empty() {
                return Err("Usage: filter <all|active|standby|maintenance>".to_string());
            }
            value.parse::<StatusFilter>().map(BrowseCommand::Filter)
        }
        "search" | "/" => Ok(BrowseCommand::Search(rest.to_string())),
        "select" | "s" => required_id(rest, "select").map(BrowseCommand::Select),
        "show" => required_id(rest, "show").map(BrowseCommand::Show),
        "reload" | "r" => Ok(BrowseCommand::Reload),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
        other => Err(format!("Unknown command: {} (type `help` for commands)", other)),
    }
}

fn required_id(rest: &str, command: &str) -> Result<String, String> {
    let id = rest.trim();
    if id.is_empty() {
        Err(format!("Usage: {} <id>", command))
    } else {
        Ok(id.to_string())
    }
}

pub fn run(source: Option<&str>, config: &Config) -> Result<()> {
    let location = config.source_or(source);
    let renderer = TerminalRenderer::new(io::stdout())
        .with_width(terminal_width())
        .with_time_format(config.display.time_format())
        .with_reload_hint("Type `reload` to try again")
        .with_effect(effects::from_millis(super::stagger_for(None, config)));

    let mut controller = InteractionController::new(open_source(location), renderer)
        .with_notification_duration(config.display.notification_duration());
    controller.start()?;
    print_help();

    let stdin = io::stdin();
    run_loop(&mut controller, stdin.lock(), &mut io::stdout())
}

/// Feed input lines to the controller until `quit` or end of input
pub fn run_loop<S, R, I, W>(controller: &mut InteractionController<S, R>, mut input: I, prompt_out: &mut W) -> Result<()>
where
    S: DataSource,
    R: Renderer,
    I: BufRead,
    W: Write,
{
    loop {
        write!(prompt_out, "{}", prompt_text(controller.phase(), controller.state()))?;
        prompt_out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read input")? == 0 {
            log::debug!("End of input, leaving browse");
            return Ok(());
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{} {}", "✗".red(), message);
                continue;
            }
        };

        if !dispatch(controller, command)? {
            return Ok(());
        }
    }
}

/// Apply one command. Returns false when the session should end.
fn dispatch<S: DataSource, R: Renderer>(
    controller: &mut InteractionController<S, R>,
    command: BrowseCommand,
) -> Result<bool> {
    let needs_catalog = matches!(
        command,
        BrowseCommand::Filter(_) | BrowseCommand::Search(_) | BrowseCommand::Select(_) | BrowseCommand::Show(_)
    );
    if needs_catalog && controller.phase() != &Phase::Ready {
        eprintln!("{} Catalog is not loaded; type `reload` to try again", "⚠".yellow());
        return Ok(true);
    }

    match command {
        BrowseCommand::Filter(filter) => {
            controller.set_filter(filter)?;
        }
        BrowseCommand::Search(text) => {
            controller.set_search_term(&text)?;
        }
        BrowseCommand::Select(id) => {
            if !controller.select(&id)? {
                eprintln!("{} No visible agent with id {}", "✗".red(), id);
            }
        }
        BrowseCommand::Show(id) => {
            if !controller.details(&id)? {
                eprintln!("{} Agent '{}' not found", "✗".red(), id);
            }
        }
        BrowseCommand::Reload => controller.reload()?,
        BrowseCommand::Help => print_help(),
        BrowseCommand::Quit => return Ok(false),
        BrowseCommand::Empty => {}
    }

    Ok(true)
}

fn prompt_text(phase: &Phase, state: &UiState) -> String {
    match phase {
        Phase::Ready if state.search_term.is_empty() => format!("[{}]> ", state.current_filter),
        Phase::Ready => format!("[{} /{}]> ", state.current_filter, state.search_term),
        Phase::Loading => "[loading]> ".to_string(),
        Phase::Error(_) => "[error]> ".to_string(),
    }
}

fn print_help() {
    println!();
    println!("{}", "Commands:".bold());
    println!("  {:28} {}", "filter <all|active|standby|maintenance>".cyan(), "Filter by status".dimmed());
    println!("  {:28} {}", "search <text>".cyan(), "Search name, type, description, capabilities".dimmed());
    println!("  {:28} {}", "select <id>".cyan(), "Connect to a visible agent".dimmed());
    println!("  {:28} {}", "show <id>".cyan(), "Show every field of an agent".dimmed());
    println!("  {:28} {}", "reload".cyan(), "Load the catalog again".dimmed());
    println!("  {:28} {}", "quit".cyan(), "Leave".dimmed());
    println!();
}
