//! JSON and YAML output for pipes and scripts
//!
//! Only data is emitted: the card list, a single card for details, and an
//! error object. Filter controls, the status bar and notifications are
//! interactive chrome and are skipped.

use eyre::{Context, Result};
use serde::Serialize;
use std::io::Write;

use super::{CardView, DEFAULT_TIME_FORMAT, Notification, Renderer, StatusBar};
use crate::catalog::agent::Agent;
use crate::catalog::filter::StatusFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredFormat {
    Json,
    Yaml,
}

pub struct StructuredRenderer<W: Write> {
    out: W,
    format: StructuredFormat,
    time_format: String,
}

#[derive(Serialize)]
struct ErrorView<'a> {
    error: &'a str,
}

impl<W: Write> StructuredRenderer<W> {
    pub fn new(out: W, format: StructuredFormat) -> Self {
        Self {
            out,
            format,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }

    pub fn with_time_format(mut self, time_format: &str) -> Self {
        self.time_format = time_format.to_string();
        self
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, value: &T) -> Result<()> {
        match self.format {
            StructuredFormat::Json => {
                let text = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
                writeln!(self.out, "{}", text)?;
            }
            StructuredFormat::Yaml => {
                let text = serde_yaml::to_string(value).context("Failed to serialize YAML output")?;
                write!(self.out, "{}", text)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for StructuredRenderer<W> {
    /// An empty visible set is emitted as an empty list
    fn render(&mut self, visible: &[&Agent]) -> Result<()> {
        let cards: Vec<CardView> = visible
            .iter()
            .map(|agent| CardView::from_agent(agent, &self.time_format))
            .collect();
        self.emit(&cards)
    }

    fn render_filters(&mut self, _active: StatusFilter) -> Result<()> {
        Ok(())
    }

    fn render_status(&mut self, _status: &StatusBar) -> Result<()> {
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        self.emit(&ErrorView { error: message })
    }

    fn render_details(&mut self, agent: &Agent) -> Result<()> {
        let card = CardView::from_agent(agent, &self.time_format);
        self.emit(&card)
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        log::debug!("Notification (not emitted in structured output): {}", notification.message);
        Ok(())
    }
}
