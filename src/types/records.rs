//! Records read from the data service and the summary derived from them

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Authenticated user context that scopes every read
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_id)
    }
}

/// Provisioning status of a service (raw string on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceStatus {
    Active,
    Inactive,
    Other(String),
}

impl ServiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ServiceStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            _ => Self::Other(s),
        }
    }
}

impl From<ServiceStatus> for String {
    fn from(status: ServiceStatus) -> Self {
        match status {
            ServiceStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Status of an API connection (raw string on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error,
    Other(String),
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl From<String> for ConnectionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "connected" => Self::Connected,
            "disconnected" => Self::Disconnected,
            "error" => Self::Error,
            _ => Self::Other(s),
        }
    }
}

impl From<ConnectionStatus> for String {
    fn from(status: ConnectionStatus) -> Self {
        match status {
            ConnectionStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// A provisioned service owned by a user.
///
/// `price` stays a raw JSON value: the service stores a decimal that may
/// arrive as a number, a numeric string, or be missing entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub user_id: String,
    #[serde(default)]
    pub price: Value,
    pub status: ServiceStatus,
}

/// `{price}` projection of a service row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(default)]
    pub price: Value,
}

impl From<&ServiceRecord> for PriceRecord {
    fn from(record: &ServiceRecord) -> Self {
        Self {
            price: record.price.clone(),
        }
    }
}

/// A connected third-party tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub user_id: String,
    pub tool_name: String,
    pub status: ConnectionStatus,
    #[serde(default, deserialize_with = "deserialize_last_used")]
    pub last_used: Option<DateTime<Utc>>,
}

/// Offset-less forms a `timestamp` column may produce; read as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a `last_used` value. RFC 3339 keeps its offset, naive
/// timestamps are taken as UTC.
pub fn parse_last_used(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// An unreadable `last_used` degrades that row to "never used" instead of
/// failing the whole connections read.
fn deserialize_last_used<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match &raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => parse_last_used(s),
        Some(_) => None,
    };
    if parsed.is_none() {
        tracing::warn!(value = ?raw, "unreadable last_used, treating as never used");
    }
    Ok(parsed)
}

/// Results of the three identity-scoped reads of one fetch cycle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FetchedRecords {
    /// Server-side count of active services (no rows transferred)
    pub active_service_count: u64,
    /// All connections, in the order the service returned them
    pub connections: Vec<ConnectionRecord>,
    /// `{price}` projection of every service regardless of status
    pub service_prices: Vec<PriceRecord>,
}

/// Summary figures shown on the overview.
///
/// Derived from one fetch cycle and never patched incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub active_service_count: u64,
    pub connected_tool_count: u64,
    pub total_spent: f64,
}
