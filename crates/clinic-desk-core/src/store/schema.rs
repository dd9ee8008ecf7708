//! SQLite schema definition.

/// Local store schema.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Local Storage (key/value, last write wins)
-- ============================================================================

CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
