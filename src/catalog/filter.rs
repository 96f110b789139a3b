//! Filtering of the catalog by status and free-text search

use serde::{Deserialize, Serialize};
use std::fmt;

use super::agent::{Agent, Status};

/// Status filter with a universal `all` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Standby,
    Maintenance,
}

impl StatusFilter {
    /// Filter controls in display order
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Active,
        StatusFilter::Standby,
        StatusFilter::Maintenance,
    ];

    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == Status::Active,
            StatusFilter::Standby => status == Status::Standby,
            StatusFilter::Maintenance => status == Status::Maintenance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Standby => "standby",
            StatusFilter::Maintenance => "maintenance",
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        match status {
            Status::Active => StatusFilter::Active,
            Status::Standby => StatusFilter::Standby,
            Status::Maintenance => StatusFilter::Maintenance,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            other => other
                .parse::<Status>()
                .map(StatusFilter::from)
                .map_err(|_| format!("Unknown filter: {} (expected all, active, standby or maintenance)", s)),
        }
    }
}

/// Current filter and search state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub current_filter: StatusFilter,
    /// Always stored lowercased
    pub search_term: String,
}

impl UiState {
    pub fn new(filter: StatusFilter, raw_search: &str) -> Self {
        Self {
            current_filter: filter,
            search_term: raw_search.to_lowercase(),
        }
    }
}

/// Does the agent contain `term` (already lowercased) in any searchable field?
pub fn matches_search(agent: &Agent, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    agent.name.to_lowercase().contains(term)
        || agent.kind.to_lowercase().contains(term)
        || agent.description.to_lowercase().contains(term)
        || agent.capabilities.iter().any(|cap| cap.to_lowercase().contains(term))
}

/// Derive the visible set. Stable: survivors keep their catalog order.
pub fn apply<'a>(agents: &'a [Agent], state: &UiState) -> Vec<&'a Agent> {
    agents
        .iter()
        .filter(|agent| state.current_filter.matches(agent.status))
        .filter(|agent| matches_search(agent, &state.search_term))
        .collect()
}
