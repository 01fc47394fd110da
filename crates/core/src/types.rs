/// Primary keys are PostgreSQL BIGSERIAL identity values.
pub type DbId = i64;

/// Optimistic-lock token. Starts at 1 and only ever increases.
pub type Version = i32;

/// Timestamps are stored as TIMESTAMPTZ and handled in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
