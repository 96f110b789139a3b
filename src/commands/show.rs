//! Detail view of a single agent

use eyre::{Context, Result};

use crate::catalog::source::{DataSource, open_source};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::render::Renderer;

pub fn run(id: &str, source: Option<&str>, format: OutputFormat, config: &Config) -> Result<()> {
    let location = config.source_or(source);
    let report = open_source(location)
        .load()
        .with_context(|| format!("Failed to load agents from {}", location))?;

    let agent = report
        .agents
        .iter()
        .find(|agent| agent.id.as_str() == id)
        .ok_or_else(|| eyre::eyre!("Agent '{}' not found in {}", id, location))?;

    let mut renderer = super::renderer_for(format, config, 0);
    renderer.render_details(agent)
}
