pub mod browse;
pub mod completions;
pub mod config;
pub mod list;
pub mod show;
pub mod status;

use std::io::{self, IsTerminal};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::render::Renderer;
use crate::render::effects;
use crate::render::structured::{StructuredFormat, StructuredRenderer};
use crate::render::terminal::{TerminalRenderer, terminal_width};

/// Renderer writing to stdout in the requested format
pub fn renderer_for(format: OutputFormat, config: &Config, stagger_ms: u64) -> Box<dyn Renderer> {
    let time_format = config.display.time_format();
    match format {
        OutputFormat::Text => Box::new(
            TerminalRenderer::new(io::stdout())
                .with_width(terminal_width())
                .with_time_format(time_format)
                .with_effect(effects::from_millis(stagger_ms)),
        ),
        OutputFormat::Json => {
            Box::new(StructuredRenderer::new(io::stdout(), StructuredFormat::Json).with_time_format(time_format))
        }
        OutputFormat::Yaml => {
            Box::new(StructuredRenderer::new(io::stdout(), StructuredFormat::Yaml).with_time_format(time_format))
        }
    }
}

/// Reveal delay to use: explicit value, else the configured one on a TTY, else none
pub fn stagger_for(explicit: Option<u64>, config: &Config) -> u64 {
    explicit.unwrap_or_else(|| {
        if io::stdout().is_terminal() {
            config.display.stagger_ms
        } else {
            0
        }
    })
}
