//! Rendering of the visible agent set
//!
//! A `Renderer` replaces its whole displayed collection on every call to
//! `render`; there is no incremental patching. Renderers:
//! - `terminal` prints colored cards for interactive use
//! - `structured` emits JSON or YAML view-models for pipes
//!
//! Timed reveal effects live in `effects` and are injected into the
//! terminal renderer; nothing in the core depends on them.

pub mod effects;
pub mod structured;
pub mod terminal;

use chrono::{DateTime, Local};
use eyre::Result;
use serde::Serialize;
use std::time::Duration;

use crate::catalog::agent::{Agent, Status};
use crate::catalog::filter::StatusFilter;

/// Default last-active format: `2024/1/15 14:30:00`
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%-m/%-d %H:%M:%S";

/// Default time a notification stays visible
pub const DEFAULT_NOTIFICATION: Duration = Duration::from_secs(3);

pub trait Renderer {
    /// Replace the displayed collection. An empty slice shows the
    /// "no results" placeholder.
    fn render(&mut self, visible: &[&Agent]) -> Result<()>;

    /// Show the filter controls with `active` as the only active one
    fn render_filters(&mut self, active: StatusFilter) -> Result<()>;

    /// Show the total count and last-update time
    fn render_status(&mut self, status: &StatusBar) -> Result<()>;

    /// Show the error view in place of the list
    fn render_error(&mut self, message: &str) -> Result<()>;

    /// Show every field of one agent
    fn render_details(&mut self, agent: &Agent) -> Result<()>;

    /// Show a transient notification
    fn notify(&mut self, notification: &Notification) -> Result<()>;
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn render(&mut self, visible: &[&Agent]) -> Result<()> {
        (**self).render(visible)
    }

    fn render_filters(&mut self, active: StatusFilter) -> Result<()> {
        (**self).render_filters(active)
    }

    fn render_status(&mut self, status: &StatusBar) -> Result<()> {
        (**self).render_status(status)
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        (**self).render_error(message)
    }

    fn render_details(&mut self, agent: &Agent) -> Result<()> {
        (**self).render_details(agent)
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        (**self).notify(notification)
    }
}

/// Display-ready projection of an agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Status,
    pub status_label: &'static str,
    pub description: String,
    pub capabilities: Vec<String>,
    /// Clamped into 0..=100
    pub power_percent: u8,
    pub power_level_raw: i64,
    pub location: String,
    pub last_active: String,
}

impl CardView {
    pub fn from_agent(agent: &Agent, time_format: &str) -> Self {
        Self {
            id: agent.id.to_string(),
            name: agent.name.clone(),
            kind: agent.kind.clone(),
            status: agent.status,
            status_label: agent.status.label(),
            description: agent.description.clone(),
            capabilities: agent.capabilities.clone(),
            power_percent: agent.power_percent(),
            power_level_raw: agent.power_level,
            location: agent.location.clone(),
            last_active: agent.last_active_display(time_format),
        }
    }
}

/// Auxiliary status display, filled once after a successful load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBar {
    pub agent_count: usize,
    pub last_update: DateTime<Local>,
}

impl StatusBar {
    pub fn now(agent_count: usize) -> Self {
        Self {
            agent_count,
            last_update: Local::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    /// How long the notification stays up before dismissing itself
    pub duration: Duration,
}

impl Notification {
    /// Notification shown when a card is selected
    pub fn agent_connected(agent: &Agent, duration: Duration) -> Self {
        Self {
            message: format!("Agent {} connected", agent.name),
            duration,
        }
    }
}
