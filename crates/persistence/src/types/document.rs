//! Resource documents and their store-managed fields.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde_json::{Map, Value};

/// A resource document: a JSON object of field names to values.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned canonical identifier.
pub const CANONICAL_ID_FIELD: &str = "_id";

/// Field holding the optional caller-assigned custom identifier.
pub const CUSTOM_ID_FIELD: &str = "id";

/// Field holding the creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Field holding the last-update timestamp.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Fields that only the store may write.
///
/// They are dropped from every `create` and `update` payload.
pub const STORE_MANAGED_FIELDS: [&str; 3] =
    [CANONICAL_ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// Removes store-managed fields from a payload.
///
/// Returns the names of the fields that were present and dropped.
pub fn strip_store_managed_fields(payload: &mut Document) -> Vec<&'static str> {
    STORE_MANAGED_FIELDS
        .into_iter()
        .filter(|field| payload.remove(*field).is_some())
        .collect()
}

/// Returns the canonical identifier of a stored document, as stored.
pub fn canonical_id_of(document: &Document) -> Option<&str> {
    document.get(CANONICAL_ID_FIELD).and_then(Value::as_str)
}

/// Formats a timestamp the way documents store it (RFC 3339, UTC, millis).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Picks the `updatedAt` instant for an update happening at `now`.
///
/// The result is at least one millisecond after `previous` when that holds a
/// stored timestamp, so every successful update advances the field even
/// within the same millisecond as the last write.
pub fn next_updated_at(previous: Option<&Value>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous
        .and_then(Value::as_str)
        .and_then(|stored| DateTime::parse_from_rfc3339(stored).ok())
        .map(|stored| stored.with_timezone(&Utc) + TimeDelta::milliseconds(1));

    match floor {
        Some(floor) if floor > now => floor,
        _ => now,
    }
}
