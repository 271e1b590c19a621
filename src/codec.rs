//! Conversion between typed records and the flat field maps kept in the document store.
//!
//! The store has no native timestamp type, so timestamp fields travel as canonical
//! RFC 3339 strings (nanosecond precision, explicit `+00:00` offset). The canonical
//! form is fixed-width, which keeps string comparison in the store chronological.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// A stored record: top-level field name to JSON value.
pub type Document = Map<String, Value>;

/// Fields that hold timestamps in every collection.
pub const TIMESTAMP_FIELDS: [&str; 3] = ["created_at", "updated_at", "due_date"];

/// Formats a timestamp in the canonical storage form.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, false)
}

/// Parses an ISO-8601 timestamp, accepting any offset (including `Z`).
/// Date-times without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Converts a record (or partial update) into storage fields.
///
/// Only top-level fields are touched; timestamp fields are rewritten in canonical form.
pub fn serialize<T: Serialize>(record: &T) -> Result<Document, AppError> {
    let mut fields = match serde_json::to_value(record)? {
        Value::Object(fields) => fields,
        other => {
            return Err(AppError::InternalServerError(format!(
                "Expected a field map, got {}",
                other
            )))
        }
    };
    for name in TIMESTAMP_FIELDS {
        if let Some(Value::String(raw)) = fields.get_mut(name) {
            if let Some(timestamp) = parse_timestamp(raw) {
                *raw = format_timestamp(&timestamp);
            }
        }
    }
    Ok(fields)
}

/// Normalizes the timestamp fields of a stored document.
///
/// A value that does not parse is left as the raw string instead of failing the
/// whole document.
pub fn normalize(mut fields: Document) -> Document {
    for name in TIMESTAMP_FIELDS {
        if let Some(Value::String(raw)) = fields.get_mut(name) {
            match parse_timestamp(raw) {
                Some(timestamp) => *raw = format_timestamp(&timestamp),
                None => log::warn!("Leaving unparseable {} value {:?} as-is", name, raw),
            }
        }
    }
    fields
}

/// Converts storage fields back into a typed record.
pub fn deserialize<T: DeserializeOwned>(fields: Document) -> Result<T, AppError> {
    Ok(serde_json::from_value(Value::Object(normalize(fields)))?)
}
