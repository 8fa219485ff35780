//! JSON snapshot of a movie's genre or cast names.
//!
//! The snapshot is the string stored in `movies.genre_json` / `movies.cast_json`.
//! Reading one never fails: anything that is not a JSON array of strings
//! reads as an empty list.

/// Snapshot value of an empty list. Also the column default.
pub const EMPTY: &str = "[]";

/// Parse a stored snapshot. Malformed input yields an empty list.
#[must_use]
pub fn parse_names(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    serde_json::from_str::<Vec<String>>(trimmed).unwrap_or_default()
}

/// Serialize names for storage.
#[must_use]
pub fn serialize_names(names: &[String]) -> String {
    serde_json::to_string(names).unwrap_or_else(|_| EMPTY.to_string())
}

/// True when the stored snapshot carries no names.
#[must_use]
pub fn is_empty(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == EMPTY || parse_names(trimmed).is_empty()
}

/// Read path for one list: linked names win when there are any, the snapshot
/// otherwise.
#[must_use]
pub fn resolve(linked: Vec<String>, snapshot: &str) -> Vec<String> {
    if linked.is_empty() {
        parse_names(snapshot)
    } else {
        linked
    }
}
