//! Interaction controller
//!
//! Owns the UI state and the load phase. Every accepted event re-derives
//! the visible set and hands it to the renderer.
//!
//! Phases: `Loading` → `Ready` on a successful load, `Loading` → `Error`
//! on failure. Filter, search and select events are only processed while
//! `Ready`; `reload` restarts from `Loading` in any phase.

use eyre::Result;
use std::time::Duration;

use crate::catalog::agent::Agent;
use crate::catalog::filter::{self, StatusFilter, UiState};
use crate::catalog::source::DataSource;
use crate::render::{Notification, Renderer, StatusBar};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Error(String),
}

pub struct InteractionController<S: DataSource, R: Renderer> {
    source: S,
    renderer: R,
    agents: Vec<Agent>,
    state: UiState,
    initial_state: UiState,
    phase: Phase,
    skipped: usize,
    notification_duration: Duration,
}

impl<S: DataSource, R: Renderer> InteractionController<S, R> {
    pub fn new(source: S, renderer: R) -> Self {
        Self {
            source,
            renderer,
            agents: Vec::new(),
            state: UiState::default(),
            initial_state: UiState::default(),
            phase: Phase::Loading,
            skipped: 0,
            notification_duration: crate::render::DEFAULT_NOTIFICATION,
        }
    }

    /// Start from a preset filter and search instead of the defaults
    pub fn with_state(mut self, state: UiState) -> Self {
        self.state = state.clone();
        self.initial_state = state;
        self
    }

    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    /// Load the catalog and show it, or show the error view
    pub fn start(&mut self) -> Result<()> {
        self.phase = Phase::Loading;
        self.agents.clear();
        self.skipped = 0;

        match self.source.load() {
            Ok(report) => {
                self.agents = report.agents;
                self.skipped = report.skipped.len();
                self.phase = Phase::Ready;

                self.renderer.render_filters(self.state.current_filter)?;
                self.refresh()?;
                self.renderer.render_status(&StatusBar::now(self.agents.len()))?;
            }
            Err(e) => {
                let message = e.to_string();
                log::error!("Failed to load agents: {}", message);
                self.phase = Phase::Error(message.clone());
                self.renderer.render_error(&message)?;
            }
        }

        Ok(())
    }

    /// Restart the whole flow with the initial UI state
    pub fn reload(&mut self) -> Result<()> {
        log::info!("Reloading catalog from {}", self.source.location());
        self.state = self.initial_state.clone();
        self.start()
    }

    /// Select a status filter. Returns false if the event was ignored.
    pub fn set_filter(&mut self, filter: StatusFilter) -> Result<bool> {
        if !self.is_ready("filter") {
            return Ok(false);
        }

        self.state.current_filter = filter;
        log::debug!("Filter set to {}", filter);

        self.renderer.render_filters(filter)?;
        self.refresh()?;
        Ok(true)
    }

    /// Update the search term from raw input. Returns false if ignored.
    pub fn set_search_term(&mut self, raw: &str) -> Result<bool> {
        if !self.is_ready("search") {
            return Ok(false);
        }

        self.state.search_term = raw.to_lowercase();
        log::debug!("Search term set to {:?}", self.state.search_term);

        self.refresh()?;
        Ok(true)
    }

    /// Select a visible card by id and raise its notification.
    /// Returns false if the event was ignored or no visible card has that id.
    pub fn select(&mut self, id: &str) -> Result<bool> {
        if !self.is_ready("select") {
            return Ok(false);
        }

        let notification = self
            .visible()
            .into_iter()
            .find(|agent| agent.id.as_str() == id)
            .map(|agent| Notification::agent_connected(agent, self.notification_duration));

        match notification {
            Some(notification) => {
                log::info!("{}", notification.message);
                self.renderer.notify(&notification)?;
                Ok(true)
            }
            None => {
                log::debug!("No visible agent with id {}", id);
                Ok(false)
            }
        }
    }

    /// Show the detail view of any loaded agent. Returns false if not found.
    pub fn details(&mut self, id: &str) -> Result<bool> {
        if !self.is_ready("details") {
            return Ok(false);
        }

        match self.agents.iter().find(|agent| agent.id.as_str() == id) {
            Some(agent) => {
                self.renderer.render_details(agent)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Agents passing the current filter and search, in catalog order
    pub fn visible(&self) -> Vec<&Agent> {
        filter::apply(&self.agents, &self.state)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    #[cfg(test)]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Records dropped during the last load
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn location(&self) -> String {
        self.source.location()
    }

    fn is_ready(&self, event: &str) -> bool {
        if self.phase == Phase::Ready {
            true
        } else {
            log::debug!("Ignoring {} event while {:?}", event, self.phase);
            false
        }
    }

    fn refresh(&mut self) -> Result<()> {
        let visible = filter::apply(&self.agents, &self.state);
        self.renderer.render(&visible)
    }

    #[cfg(test)]
    fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::error::LoadError;
    use std::cell::Cell;

    /// Source returning a fixed body, or a failure
    struct StaticSource {
        body: Option<&'static str>,
        loads: Cell<usize>,
    }

    impl StaticSource {
        fn ok(body: &'static str) -> Self {
            Self {
                body: Some(body),
                loads: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                body: None,
                loads: Cell::new(0),
            }
        }
    }

    impl DataSource for StaticSource {
        fn location(&self) -> String {
            "static".to_string()
        }

        fn fetch(&self) -> Result<String, LoadError> {
            self.loads.set(self.loads.get() + 1);
            match self.body {
                Some(body) => Ok(body.to_string()),
                None => Err(LoadError::Http {
                    url: "static".to_string(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Frame {
        Cards(Vec<String>),
        NoResults,
        Filters(StatusFilter),
        Status(usize),
        Error(String),
        Details(String),
        Notice(String),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Frame>,
    }

    impl RecordingRenderer {
        fn last_cards(&self) -> Option<&Frame> {
            self.frames
                .iter()
                .rev()
                .find(|f| matches!(f, Frame::Cards(_) | Frame::NoResults))
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, visible: &[&Agent]) -> Result<()> {
            if visible.is_empty() {
                self.frames.push(Frame::NoResults);
            } else {
                self.frames
                    .push(Frame::Cards(visible.iter().map(|a| a.id.to_string()).collect()));
            }
            Ok(())
        }

        fn render_filters(&mut self, active: StatusFilter) -> Result<()> {
            self.frames.push(Frame::Filters(active));
            Ok(())
        }

        fn render_status(&mut self, status: &StatusBar) -> Result<()> {
            self.frames.push(Frame::Status(status.agent_count));
            Ok(())
        }

        fn render_error(&mut self, message: &str) -> Result<()> {
            self.frames.push(Frame::Error(message.to_string()));
            Ok(())
        }

        fn render_details(&mut self, agent: &Agent) -> Result<()> {
            self.frames.push(Frame::Details(agent.id.to_string()));
            Ok(())
        }

        fn notify(&mut self, notification: &Notification) -> Result<()> {
            self.frames.push(Frame::Notice(notification.message.clone()));
            Ok(())
        }
    }

    const GHOST_AND_RAVEN: &str = r#"{
        "agents": [
            {
                "id": 1, "name": "Ghost", "type": "Infiltrator", "status": "active",
                "description": "Silent recon unit", "location": "Neo Tokyo",
                "capabilities": ["stealth"], "powerLevel": 80,
                "lastActive": "2024-01-15T14:30:00Z"
            },
            {
                "id": 2, "name": "Raven", "type": "Enforcer", "status": "standby",
                "description": "Heavy frame", "location": "Sector 7",
                "capabilities": ["combat"], "powerLevel": 95,
                "lastActive": "2024-01-14T09:00:00Z"
            }
        ]
    }"#;

    fn cards(ids: &[&str]) -> Frame {
        Frame::Cards(ids.iter().map(|s| s.to_string()).collect())
    }

    fn ready_controller() -> InteractionController<StaticSource, RecordingRenderer> {
        let mut controller =
            InteractionController::new(StaticSource::ok(GHOST_AND_RAVEN), RecordingRenderer::default());
        controller.start().unwrap();
        controller
    }

    #[test]
    fn test_start_renders_full_set_and_status() {
        let controller = ready_controller();

        assert_eq!(controller.phase(), &Phase::Ready);
        assert_eq!(
            controller.renderer().frames,
            vec![
                Frame::Filters(StatusFilter::All),
                cards(&["1", "2"]),
                Frame::Status(2),
            ]
        );
    }

    #[test]
    fn test_start_failure_shows_error_and_no_list() {
        let mut controller = InteractionController::new(StaticSource::failing(), RecordingRenderer::default());
        controller.start().unwrap();

        assert!(matches!(controller.phase(), Phase::Error(msg) if msg.contains("connection refused")));
        assert_eq!(controller.renderer().frames.len(), 1);
        assert!(matches!(&controller.renderer().frames[0], Frame::Error(_)));
        assert!(controller.agents().is_empty());
    }

    #[test]
    fn test_malformed_document_is_load_error() {
        let mut controller =
            InteractionController::new(StaticSource::ok("<html>404</html>"), RecordingRenderer::default());
        controller.start().unwrap();

        assert!(matches!(controller.phase(), Phase::Error(_)));
    }

    #[test]
    fn test_events_ignored_outside_ready() {
        let mut controller = InteractionController::new(StaticSource::failing(), RecordingRenderer::default());

        assert!(!controller.set_filter(StatusFilter::Active).unwrap());
        controller.start().unwrap();
        assert!(!controller.set_filter(StatusFilter::Active).unwrap());
        assert!(!controller.set_search_term("ghost").unwrap());
        assert!(!controller.select("1").unwrap());

        assert_eq!(controller.state(), &UiState::default());
        assert_eq!(controller.renderer().frames.len(), 1);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut controller = ready_controller();

        assert!(controller.set_filter(StatusFilter::Active).unwrap());
        assert_eq!(controller.renderer().last_cards(), Some(&cards(&["1"])));

        controller.set_filter(StatusFilter::All).unwrap();
        assert!(controller.set_search_term("combat").unwrap());
        assert_eq!(controller.renderer().last_cards(), Some(&cards(&["2"])));

        controller.set_search_term("zzz").unwrap();
        assert_eq!(controller.renderer().last_cards(), Some(&Frame::NoResults));
    }

    #[test]
    fn test_set_filter_marks_single_active_control() {
        let mut controller = ready_controller();
        controller.set_filter(StatusFilter::Standby).unwrap();

        let frames = &controller.renderer().frames;
        let last_filters = frames.iter().rev().find_map(|f| match f {
            Frame::Filters(active) => Some(*active),
            _ => None,
        });
        assert_eq!(last_filters, Some(StatusFilter::Standby));
        assert_eq!(frames.last(), Some(&cards(&["2"])));
    }

    #[test]
    fn test_search_term_is_lowercased() {
        let mut controller = ready_controller();
        controller.set_search_term("GHoST").unwrap();

        assert_eq!(controller.state().search_term, "ghost");
        assert_eq!(controller.renderer().last_cards(), Some(&cards(&["1"])));
    }

    #[test]
    fn test_every_keystroke_rerenders() {
        let mut controller = ready_controller();
        let before = controller.renderer().frames.len();

        for prefix in ["r", "ra", "rav", "rave", "raven"] {
            controller.set_search_term(prefix).unwrap();
        }

        assert_eq!(controller.renderer().frames.len(), before + 5);
        assert_eq!(controller.renderer().last_cards(), Some(&cards(&["2"])));
    }

    #[test]
    fn test_select_notifies_visible_agent() {
        let mut controller = ready_controller();

        assert!(controller.select("2").unwrap());
        assert_eq!(
            controller.renderer().frames.last(),
            Some(&Frame::Notice("Agent Raven connected".to_string()))
        );

        controller.set_filter(StatusFilter::Active).unwrap();
        assert!(!controller.select("2").unwrap());
        assert!(!controller.select("99").unwrap());
    }

    #[test]
    fn test_details_for_loaded_agent() {
        let mut controller = ready_controller();

        assert!(controller.details("1").unwrap());
        assert_eq!(controller.renderer().frames.last(), Some(&Frame::Details("1".to_string())));
        assert!(!controller.details("missing").unwrap());
    }

    #[test]
    fn test_reload_restarts_with_initial_state() {
        let mut controller = ready_controller();
        controller.set_filter(StatusFilter::Standby).unwrap();
        controller.set_search_term("raven").unwrap();

        controller.reload().unwrap();

        assert_eq!(controller.phase(), &Phase::Ready);
        assert_eq!(controller.state(), &UiState::default());
        assert_eq!(controller.source.loads.get(), 2);
        assert_eq!(controller.renderer().last_cards(), Some(&cards(&["1", "2"])));
    }

    #[test]
    fn test_preset_state_applies_on_start() {
        let mut controller =
            InteractionController::new(StaticSource::ok(GHOST_AND_RAVEN), RecordingRenderer::default())
                .with_state(UiState::new(StatusFilter::All, "STEALTH"));
        controller.start().unwrap();

        assert_eq!(controller.renderer().last_cards(), Some(&cards(&["1"])));
    }

    #[test]
    fn test_visible_matches_last_render() {
        let mut controller = ready_controller();
        controller.set_filter(StatusFilter::Standby).unwrap();

        let ids: Vec<String> = controller.visible().iter().map(|a| a.id.to_string()).collect();
        assert_eq!(Frame::Cards(ids), cards(&["2"]));
    }
}
