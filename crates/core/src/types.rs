/// Entity primary keys are server-assigned UUIDs.
pub type DbId = uuid::Uuid;

/// The append-only `events` table uses a BIGSERIAL sequence instead.
pub type EventId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
