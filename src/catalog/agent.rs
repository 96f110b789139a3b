//! Agent records

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Catalog identifier. The resource may carry it as a string or a number;
/// both are kept as their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AgentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
            Float(f64),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
            RawId::Float(n) => n.to_string(),
        };
        Ok(Self(id))
    }
}

/// Operational status of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Standby,
    Maintenance,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::Standby, Status::Maintenance];

    /// Display label shown on cards
    pub fn label(&self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Standby => "STANDBY",
            Status::Maintenance => "MAINTENANCE",
        }
    }

    /// Indicator lamp state: active is lit, standby warns, maintenance is dark
    pub fn indicator(&self) -> Indicator {
        match self {
            Status::Active => Indicator::Lit,
            Status::Standby => Indicator::Warning,
            Status::Maintenance => Indicator::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Standby => "standby",
            Status::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "standby" => Ok(Status::Standby),
            "maintenance" => Ok(Status::Maintenance),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Lit,
    Warning,
    Dark,
}

/// A single catalog record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,

    pub name: String,

    /// Agent class (the `type` field in the resource)
    #[serde(rename = "type")]
    pub kind: String,

    pub status: Status,

    pub description: String,

    pub location: String,

    /// Capability tags, in display order. Missing or null is empty.
    #[serde(default, deserialize_with = "deserialize_capabilities")]
    pub capabilities: Vec<String>,

    /// Power level as received, rounded to a whole number; see
    /// `power_percent` for display
    #[serde(deserialize_with = "deserialize_power_level")]
    pub power_level: i64,

    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_active: DateTime<Utc>,
}

impl Agent {
    /// Power level clamped into 0..=100 for display
    pub fn power_percent(&self) -> u8 {
        self.power_level.clamp(0, 100) as u8
    }

    /// Last-active time in the local timezone using a strftime format
    pub fn last_active_display(&self, time_format: &str) -> String {
        format_timestamp(&self.last_active, time_format)
    }
}

/// Render a UTC timestamp in local time
pub fn format_timestamp(ts: &DateTime<Utc>, time_format: &str) -> String {
    ts.with_timezone(&Local).format(time_format).to_string()
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn deserialize_capabilities<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any JSON number; fractions round to the nearest integer
fn deserialize_power_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPower {
        Signed(i64),
        Unsigned(u64),
        Float(f64),
    }

    Ok(match RawPower::deserialize(deserializer)? {
        RawPower::Signed(n) => n,
        RawPower::Unsigned(n) => i64::try_from(n).unwrap_or(i64::MAX),
        // `as` saturates at the i64 bounds
        RawPower::Float(n) => n.round() as i64,
    })
}
