/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Field name to message, ordered by field name so responses are stable.
pub type FieldErrors = std::collections::BTreeMap<String, String>;
