//! Dynamic document records and per-field kind decoding.
//!
//! Stored documents carry no fixed schema. Each value is classified on demand
//! into a [`FieldKind`] so callers can reason about fields without assuming a
//! shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// A stored document: field name → raw JSON value.
pub type Record = Map<String, Value>;

/// Storage-assigned identity key, never exposed as a data field.
pub const IDENTITY_KEY: &str = "_id";

/// Coarse classification of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Numeric,
    Text,
    Temporal,
    Unknown,
}

impl FieldKind {
    /// Classify a raw JSON value. Strings that parse as an ISO date or
    /// datetime are temporal; booleans, nulls, arrays and objects are unknown.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Number(n) if n.as_f64().is_some() => Self::Numeric,
            Value::String(s) if parse_temporal(s).is_some() => Self::Temporal,
            Value::String(_) => Self::Text,
            _ => Self::Unknown,
        }
    }
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.fff]` or RFC 3339.
pub fn parse_temporal(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ts);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc())
}

/// Read a field as a number, accepting numeric strings.
pub fn numeric_field(record: &Record, field: &str) -> Option<f64> {
    match record.get(field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a field as text.
pub fn text_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// Strip the identity key so the record can leave the API layer. Stored
/// bodies are JSON, so temporal values are already ISO-8601 strings.
pub fn clean_record(mut record: Record) -> Record {
    record.remove(IDENTITY_KEY);
    record
}
