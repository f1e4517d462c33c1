//! Small utilities shared across crates

/// Current Unix timestamp in milliseconds.
///
/// All persisted timestamps in the system are `i64` Unix millis; conversion
/// to business-timezone dates happens at the edges.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a new opaque entity id (UUID v4, lowercase hyphenated).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
