//! Colored card output for terminals

use colored::*;
use eyre::Result;
use std::io::Write;
use terminal_size::{Width, terminal_size};

use super::effects::{NoReveal, RevealEffect};
use super::{DEFAULT_TIME_FORMAT, Notification, Renderer, StatusBar};
use crate::catalog::agent::{Agent, Indicator, Status};
use crate::catalog::filter::StatusFilter;

const POWER_BAR_WIDTH: usize = 20;
const INDENT: &str = "    ";

/// Get terminal width, defaulting to 80 if not available
pub fn terminal_width() -> usize {
    terminal_size().map(|(Width(w), _)| w as usize).unwrap_or(80)
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    width: usize,
    time_format: String,
    reload_hint: String,
    effect: Box<dyn RevealEffect>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: 80,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            reload_hint: "Re-run the command to try again".to_string(),
            effect: Box::new(NoReveal),
        }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_time_format(mut self, time_format: &str) -> Self {
        self.time_format = time_format.to_string();
        self
    }

    pub fn with_reload_hint(mut self, hint: &str) -> Self {
        self.reload_hint = hint.to_string();
        self
    }

    pub fn with_effect(mut self, effect: Box<dyn RevealEffect>) -> Self {
        self.effect = effect;
        self
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_no_results(&mut self) -> Result<()> {
        writeln!(self.out, "{}", "Agents".bold())?;
        writeln!(self.out)?;
        writeln!(self.out, "  {} {}", "🤖", "No matching agents found".cyan().bold())?;
        writeln!(self.out, "  {}", "Try adjusting the search term or filter".dimmed())?;
        writeln!(self.out)?;
        Ok(())
    }

    fn write_card(&mut self, agent: &Agent) -> Result<()> {
        let lamp = match agent.status.indicator() {
            Indicator::Lit => "●".green(),
            Indicator::Warning => "●".yellow(),
            Indicator::Dark => "○".dimmed(),
        };
        writeln!(
            self.out,
            "  {} {}  {}  {}",
            lamp,
            agent.name.bold(),
            format!("({})", agent.kind).dimmed(),
            status_label(agent.status)
        )?;

        let text_width = self.width.saturating_sub(INDENT.len()).max(20);
        for line in wrap_text(&agent.description, text_width) {
            writeln!(self.out, "{}{}", INDENT, line)?;
        }

        let tags = if agent.capabilities.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            agent
                .capabilities
                .iter()
                .map(|cap| format!("[{}]", cap).cyan().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(self.out, "{}Capabilities: {}", INDENT, tags)?;

        let percent = agent.power_percent();
        writeln!(
            self.out,
            "{}Power: {} {}",
            INDENT,
            power_bar(percent).magenta(),
            format!("{}%", percent).cyan()
        )?;
        writeln!(self.out, "{}Location: {}", INDENT, agent.location)?;
        writeln!(
            self.out,
            "{}{}",
            INDENT,
            format!(
                "ID: {}  ·  Last active: {}",
                agent.id,
                agent.last_active_display(&self.time_format)
            )
            .dimmed()
        )?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, visible: &[&Agent]) -> Result<()> {
        if visible.is_empty() {
            self.write_no_results()?;
            self.out.flush()?;
            return Ok(());
        }

        writeln!(
            self.out,
            "{} ({})",
            "Agents".bold(),
            format!("{} shown", visible.len()).dimmed()
        )?;
        writeln!(self.out)?;

        for (index, agent) in visible.iter().enumerate() {
            self.effect.before_card(index);
            self.write_card(agent)?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn render_filters(&mut self, active: StatusFilter) -> Result<()> {
        let controls: Vec<String> = StatusFilter::ALL
            .iter()
            .map(|f| {
                if *f == active {
                    format!("[{}]", f.as_str().to_uppercase()).cyan().bold().to_string()
                } else {
                    f.as_str().dimmed().to_string()
                }
            })
            .collect();
        writeln!(self.out, "{} {}", "Filter:".bold(), controls.join("  "))?;
        Ok(())
    }

    fn render_status(&mut self, status: &StatusBar) -> Result<()> {
        writeln!(
            self.out,
            "{} {}  ·  {} {}",
            "Agents loaded:".dimmed(),
            status.agent_count.to_string().cyan(),
            "Last update:".dimmed(),
            status.last_update.format("%H:%M:%S").to_string().cyan()
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "  {} {}", "⚠".red(), "System error".red().bold())?;
        writeln!(self.out, "    {}", message)?;
        writeln!(self.out, "    {}", self.reload_hint.dimmed())?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn render_details(&mut self, agent: &Agent) -> Result<()> {
        writeln!(self.out, "{} {}", "Agent:".bold(), agent.name.green().bold())?;
        writeln!(self.out)?;
        writeln!(self.out, "  {:14} {}", "Type:".dimmed(), agent.kind)?;
        writeln!(self.out, "  {:14} {}", "Status:".dimmed(), status_label(agent.status))?;
        writeln!(self.out, "  {:14} {}", "Description:".dimmed(), agent.description)?;
        writeln!(self.out, "  {:14} {}", "Location:".dimmed(), agent.location)?;
        writeln!(self.out, "  {:14} {}%", "Power level:".dimmed(), agent.power_percent())?;
        writeln!(
            self.out,
            "  {:14} {}",
            "Capabilities:".dimmed(),
            agent.capabilities.join(", ")
        )?;
        writeln!(
            self.out,
            "  {:14} {}",
            "Last active:".dimmed(),
            agent.last_active_display(&self.time_format)
        )?;
        writeln!(self.out, "  {:14} {}", "ID:".dimmed(), agent.id)?;
        self.out.flush()?;
        Ok(())
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        writeln!(
            self.out,
            "{} {} {}",
            "→".green(),
            notification.message.green(),
            format!("({}s)", notification.duration.as_secs()).dimmed()
        )?;
        self.out.flush()?;
        Ok(())
    }
}

fn status_label(status: Status) -> ColoredString {
    match status {
        Status::Active => status.label().green(),
        Status::Standby => status.label().yellow(),
        Status::Maintenance => status.label().red(),
    }
}

/// Power bar scaled linearly to `percent`
fn power_bar(percent: u8) -> String {
    let filled = (percent as usize * POWER_BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(POWER_BAR_WIDTH - filled))
}

/// Wrap text to max_width, returning lines
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in s.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::agent::AgentId;
    use chrono::{TimeZone, Utc};

    fn agent(id: &str, name: &str, status: Status, capabilities: &[&str], power: i64) -> Agent {
        Agent {
            id: AgentId::new(id),
            name: name.to_string(),
            kind: "Operative".to_string(),
            status,
            description: "Works the night shift across the sprawl".to_string(),
            location: "Sector 9".to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            power_level: power,
            last_active: Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap(),
        }
    }

    fn render_to_string(visible: &[&Agent]) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(visible).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_render_empty_shows_no_results() {
        let output = render_to_string(&[]);

        assert!(output.contains("No matching agents found"));
        assert!(!output.contains("Capabilities:"));
    }

    #[test]
    fn test_render_card_fields() {
        let a = agent("AGT-1", "Ghost", Status::Active, &["stealth", "recon"], 80);
        let output = render_to_string(&[&a]);

        assert!(output.contains("Ghost"));
        assert!(output.contains("(Operative)"));
        assert!(output.contains("ACTIVE"));
        assert!(output.contains("Works the night shift"));
        assert!(output.contains("[stealth]"));
        assert!(output.contains("[recon]"));
        assert!(output.contains("80%"));
        assert!(output.contains("Sector 9"));
        assert!(output.contains("ID: AGT-1"));
        assert!(output.contains(&a.last_active_display(DEFAULT_TIME_FORMAT)));
    }

    #[test]
    fn test_render_keeps_order() {
        let a = agent("1", "Ghost", Status::Active, &[], 10);
        let b = agent("2", "Raven", Status::Standby, &[], 20);
        let output = render_to_string(&[&b, &a]);

        let raven = output.find("Raven").unwrap();
        let ghost = output.find("Ghost").unwrap();
        assert!(raven < ghost);
    }

    #[test]
    fn test_capability_tags_in_order() {
        let a = agent("1", "Ghost", Status::Active, &["zeta", "alpha", "mid"], 10);
        let output = render_to_string(&[&a]);

        let zeta = output.find("[zeta]").unwrap();
        let alpha = output.find("[alpha]").unwrap();
        let mid = output.find("[mid]").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_render_is_idempotent() {
        let a = agent("1", "Ghost", Status::Active, &["stealth"], 60);
        let b = agent("2", "Raven", Status::Maintenance, &["combat"], 30);

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&[&a, &b]).unwrap();
        let first_len = renderer.out.len();
        renderer.render(&[&a, &b]).unwrap();

        let out = renderer.into_inner();
        assert_eq!(out.len(), first_len * 2);
        assert_eq!(&out[..first_len], &out[first_len..]);
    }

    #[test]
    fn test_out_of_range_power_is_clamped() {
        let hot = agent("1", "Overclock", Status::Active, &[], 250);
        let cold = agent("2", "Drained", Status::Standby, &[], -5);

        let output = render_to_string(&[&hot, &cold]);
        assert!(output.contains("100%"));
        assert!(output.contains("0%"));
        assert!(!output.contains("250%"));
        assert!(!output.contains("-5%"));
    }

    #[test]
    fn test_power_bar_scales_linearly() {
        assert_eq!(power_bar(0), "░".repeat(20));
        assert_eq!(power_bar(100), "█".repeat(20));
        assert_eq!(power_bar(50), format!("{}{}", "█".repeat(10), "░".repeat(10)));
        assert_eq!(power_bar(25).chars().filter(|c| *c == '█').count(), 5);
    }

    #[test]
    fn test_filters_mark_single_active() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render_filters(StatusFilter::Standby).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(output.contains("[STANDBY]"));
        assert!(!output.contains("[ALL]"));
        assert!(!output.contains("[ACTIVE]"));
        assert!(!output.contains("[MAINTENANCE]"));
        assert!(output.contains("maintenance"));
    }

    #[test]
    fn test_render_error_includes_hint() {
        let mut renderer = TerminalRenderer::new(Vec::new()).with_reload_hint("Type `reload` to try again");
        renderer.render_error("Failed to load agent data").unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(output.contains("System error"));
        assert!(output.contains("Failed to load agent data"));
        assert!(output.contains("Type `reload` to try again"));
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);

        assert!(wrap_text("", 10).is_empty());
    }
}
