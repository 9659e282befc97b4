use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Parse an ISO8601 date string, falling back to the Unix epoch.
pub fn parse_iso8601_or_epoch(date_str: &str) -> DateTime<Utc> {
    if date_str.is_empty() {
        return DateTime::<Utc>::default();
    }

    date_str.parse::<DateTime<Utc>>().unwrap_or_default()
}

/// YouTube reports counters as decimal strings ("viewCount": "1234").
/// Missing, hidden or garbled counters count as zero.
pub fn parse_count(value: &Value) -> u64 {
    match value {
        Value::String(s) => s.trim().parse().unwrap_or(0),
        Value::Number(n) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

/// `comparison-2024-05-01T12-34-56-123456.json`
pub fn snapshot_file_name(now: NaiveDateTime) -> String {
    let timestamp = now
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
        .replace([':', '.'], "-");
    format!("comparison-{timestamp}.json")
}

/// Name used when `base` is already taken, e.g. `comparison-...-2.json`.
pub fn with_collision_suffix(base: &str, attempt: u32) -> String {
    match base.strip_suffix(".json") {
        Some(stem) => format!("{stem}-{attempt}.json"),
        None => format!("{base}-{attempt}"),
    }
}

/// Only bare file names may address a snapshot; anything that could walk
/// out of the data directory is rejected.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
