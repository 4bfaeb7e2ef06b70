//! `SQLite` schema for the preference store.

/// Key/value preferences, one row per key.
pub const CREATE_PREFERENCES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Bookkeeping for the store itself (currently only the schema version).
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Statements run on every open, in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_PREFERENCES_TABLE, CREATE_METADATA_TABLE];
