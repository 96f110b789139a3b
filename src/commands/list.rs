//! One-shot listing of the visible set

use colored::*;
use eyre::Result;

use crate::catalog::filter::{StatusFilter, UiState};
use crate::catalog::source::open_source;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::controller::{InteractionController, Phase};

pub struct ListArgs<'a> {
    pub source: Option<&'a str>,
    pub filter: StatusFilter,
    pub search: Option<&'a str>,
    pub stagger_ms: Option<u64>,
    pub format: OutputFormat,
    pub quiet: bool,
}

pub fn run(args: ListArgs<'_>, config: &Config) -> Result<()> {
    let location = config.source_or(args.source);
    let renderer = super::renderer_for(args.format, config, super::stagger_for(args.stagger_ms, config));

    let mut controller = InteractionController::new(open_source(location), renderer)
        .with_state(UiState::new(args.filter, args.search.unwrap_or("")));
    controller.start()?;

    if let Phase::Error(message) = controller.phase() {
        eyre::bail!("Failed to load agents from {}: {}", location, message);
    }

    if controller.skipped() > 0 && !args.quiet {
        eprintln!(
            "{} Skipped {} malformed agent record(s) in {} (see log for details)",
            "⚠".yellow(),
            controller.skipped(),
            controller.location()
        );
    }

    Ok(())
}
