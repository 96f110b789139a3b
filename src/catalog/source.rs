//! Catalog data sources
//!
//! A source performs one read of the catalog resource. It never retries and
//! never touches global state; the caller decides what to do with the result.

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use super::agent::Agent;
use super::error::{LoadError, MalformedAgentError};

/// Default resource location, relative to the working directory
pub const DEFAULT_SOURCE: &str = "agents-data.json";

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Decoded agents in document order
    pub agents: Vec<Agent>,
    /// Records that were skipped because they could not be decoded
    pub skipped: Vec<MalformedAgentError>,
}

pub trait DataSource {
    /// Human-readable location, used in messages
    fn location(&self) -> String;

    /// Read the raw resource body
    fn fetch(&self) -> Result<String, LoadError>;

    /// Read and decode the catalog
    fn load(&self) -> Result<LoadReport, LoadError> {
        let location = self.location();
        log::info!("Loading agent catalog from {}", location);

        let body = self.fetch()?;
        let report = parse_catalog(&location, &body)?;

        log::info!(
            "Loaded {} agents from {} ({} skipped)",
            report.agents.len(),
            location,
            report.skipped.len()
        );
        Ok(report)
    }
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        (**self).fetch()
    }

    fn load(&self) -> Result<LoadReport, LoadError> {
        (**self).load()
    }
}

/// Catalog stored on the local filesystem
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.location(),
            source,
        })
    }
}

/// Catalog served over http(s)
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl DataSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        let mut response = ureq::get(&self.url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => LoadError::Status {
                url: self.url.clone(),
                status,
            },
            other => LoadError::Http {
                url: self.url.clone(),
                message: other.to_string(),
            },
        })?;

        response.body_mut().read_to_string().map_err(|e| LoadError::Http {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }
}

/// Pick a source for a location string. http(s) URLs are fetched, anything
/// else is a path that may contain `~` or environment variables.
pub fn open_source(location: &str) -> Box<dyn DataSource> {
    let trimmed = location.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Box::new(HttpSource::new(trimmed))
    } else {
        let expanded = shellexpand::full(trimmed).unwrap_or_else(|_| trimmed.into());
        Box::new(FileSource::new(expanded.into_owned()))
    }
}

/// Decode a catalog document.
///
/// Records are decoded one at a time; a record that fails to decode is
/// skipped with a warning and reported in `LoadReport::skipped`.
pub fn parse_catalog(location: &str, body: &str) -> Result<LoadReport, LoadError> {
    let document: Value = serde_json::from_str(body).map_err(|source| LoadError::Parse {
        location: location.to_string(),
        source,
    })?;

    let records = document
        .get("agents")
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::Shape {
            location: location.to_string(),
        })?;

    let mut agents = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match decode_record(record) {
            Ok(agent) => agents.push(agent),
            Err(reason) => {
                let err = MalformedAgentError {
                    index,
                    id: record_id(record),
                    reason,
                };
                log::warn!("{}: {}", location, err);
                skipped.push(err);
            }
        }
    }

    Ok(LoadReport { agents, skipped })
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn decode_record(record: &Value) -> Result<Agent, String> {
    Agent::deserialize(record).map_err(|e| e.to_string())
}
