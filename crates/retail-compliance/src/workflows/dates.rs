use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a calendar date from the formats the data layer hands us.
///
/// Timestamps are reduced to their date so every evaluation on the same day agrees.
/// Anything unparseable, including impossible dates like `2025-02-30`, is `None`.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}

pub(crate) fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    // Numbers, objects and other non-string values are treated as missing.
    match Value::deserialize(deserializer)? {
        Value::String(raw) => Ok(parse_calendar_date(&raw)),
        _ => Ok(None),
    }
}
