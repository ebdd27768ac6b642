// LogQuery - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::DATE_WIRE_FORMAT;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::PathBuf;

// =============================================================================
// Log Record (externally defined)
// =============================================================================

/// Wire names of the fields the dashboard displays.
pub const FIELD_PROJECT_ID: &str = "projectId";
pub const FIELD_DEVICE_ID: &str = "deviceId";
pub const FIELD_INFO: &str = "info";
pub const FIELD_TYPE: &str = "type";
pub const FIELD_DATE: &str = "date";

const DISPLAYED_FIELDS: [&str; 5] = [
    FIELD_PROJECT_ID,
    FIELD_DEVICE_ID,
    FIELD_INFO,
    FIELD_TYPE,
    FIELD_DATE,
];

/// A single log record as served by the backend.
///
/// Only `_id` is typed. Every other field is held as the JSON value the
/// backend sent, nulls and numbers included, so a record posted back to the
/// filter or download endpoint has exactly the shape it arrived with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Unique record identifier; identity of the record.
    #[serde(rename = "_id")]
    pub id: String,

    /// All other fields, verbatim.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl LogRecord {
    /// Display text of a field. Strings are shown as-is, other values as
    /// JSON; missing and null fields are `None`.
    pub fn text(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.fields.get(name)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    pub fn project_id(&self) -> Option<Cow<'_, str>> {
        self.text(FIELD_PROJECT_ID)
    }

    pub fn device_id(&self) -> Option<Cow<'_, str>> {
        self.text(FIELD_DEVICE_ID)
    }

    /// Informational message.
    pub fn info(&self) -> Option<Cow<'_, str>> {
        self.text(FIELD_INFO)
    }

    /// Log type tag (the same value used to select the stream).
    pub fn log_type(&self) -> Option<Cow<'_, str>> {
        self.text(FIELD_TYPE)
    }

    /// Fields the table does not show.
    pub fn extra_fields(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.fields
            .iter()
            .filter(|(k, _)| !DISPLAYED_FIELDS.contains(&k.as_str()))
    }

    /// Parsed timestamp, if `date` is an RFC 3339 string.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.fields.get(FIELD_DATE)?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|d| d.with_timezone(&Utc))
    }

    /// Timestamp formatted for display; falls back to the raw value.
    pub fn display_date(&self) -> String {
        match self.timestamp() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.text(FIELD_DATE).map(Cow::into_owned).unwrap_or_default(),
        }
    }
}

// =============================================================================
// Date range
// =============================================================================

/// The date-range selection of the filter form. Either bound may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Both bounds, when both are set.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.bounds().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Parse a date typed into the filter form (`YYYY-MM-DD`, surrounding
/// whitespace ignored). Empty or malformed input is "not set".
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_WIRE_FORMAT).ok()
}

/// Format a date the way the filter endpoint expects it.
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(DATE_WIRE_FORMAT).to_string()
}

// =============================================================================
// Query mode
// =============================================================================

/// Whether the table shows the raw fetch or a server-side filtered subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    #[default]
    Unfiltered,
    Filtered,
}

// =============================================================================
// Request tokens
// =============================================================================

/// Identifies one unfiltered fetch. `seq` increases per log type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub log_type: String,
    pub seq: u64,
}

/// Identifies one filter submission by the query generation it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTicket {
    pub generation: u64,
}

/// Identifies one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportTicket {
    pub id: u64,
}

/// Everything the filter endpoint needs, captured at submit time.
#[derive(Debug, Clone)]
pub struct FilterRequest {
    pub ticket: FilterTicket,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub logs: Vec<LogRecord>,
}

/// Everything the download endpoint needs, captured at click time.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub ticket: ExportTicket,
    pub logs: Vec<LogRecord>,
    pub destination: PathBuf,
}
