use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// A single extracted value: one string, or an ordered list for fields
/// declared `multiple`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::List(items) => Some(items),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// One listing: field name to value, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: &str, value: FieldValue) {
        self.values.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The requested number of pages was reached.
    PageBudget,
    /// The pagination strategy had nowhere left to go.
    PaginationExhausted,
    /// A page came back with no containers.
    NoContainers,
    /// The caller cancelled the run between pages.
    Cancelled,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::PageBudget => "page_budget",
            StopReason::PaginationExhausted => "pagination_exhausted",
            StopReason::NoContainers => "no_containers",
            StopReason::Cancelled => "cancelled",
        }
    }
}

/// What happened to one page of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub index: usize,
    pub url: String,
    pub status_code: u16,
    pub response_time: Duration,
    pub containers_found: usize,
    pub attempts: u32,
    pub error: Option<String>,
}

impl PageSummary {
    pub fn new(index: usize, url: String) -> Self {
        Self {
            index,
            url,
            status_code: 0,
            response_time: Duration::from_secs(0),
            containers_found: 0,
            attempts: 0,
            error: None,
        }
    }

    pub fn with_error(index: usize, url: String, attempts: u32, error: String) -> Self {
        Self {
            index,
            url,
            status_code: 0,
            response_time: Duration::from_secs(0),
            containers_found: 0,
            attempts,
            error: Some(error),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub site_name: String,
    pub source_url: String,
    pub pages_requested: usize,
    pub pages_fetched: usize,
    pub total_records: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stop_reason: StopReason,
}

/// Everything a run produced, handed whole to an export sink.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub records: Vec<Record>,
    pub fields: Vec<String>,
    pub pages: Vec<PageSummary>,
    pub metadata: RunMetadata,
}

impl RunResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
