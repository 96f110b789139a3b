//! Catalog loading errors

use thiserror::Error;

/// The catalog resource could not be fetched or parsed
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {message}")]
    Http { url: String, message: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed JSON in {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{location} has no top-level \"agents\" array")]
    Shape { location: String },
}

/// A single record in the resource that could not be decoded into an agent
#[derive(Debug, Clone, Error)]
#[error("Skipped agent record #{index}{}: {reason}", .id.as_ref().map(|id| format!(" (id {})", id)).unwrap_or_default())]
pub struct MalformedAgentError {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_with_id() {
        let err = MalformedAgentError {
            index: 3,
            id: Some("AGT-9".to_string()),
            reason: "missing field `name`".to_string(),
        };
        assert_eq!(err.to_string(), "Skipped agent record #3 (id AGT-9): missing field `name`");
    }

    #[test]
    fn test_malformed_message_without_id() {
        let err = MalformedAgentError {
            index: 0,
            id: None,
            reason: "expected an object".to_string(),
        };
        assert_eq!(err.to_string(), "Skipped agent record #0: expected an object");
    }

    #[test]
    fn test_status_error_message() {
        let err = LoadError::Status {
            url: "https://example.com/agents.json".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "https://example.com/agents.json responded with HTTP 404");
    }
}
