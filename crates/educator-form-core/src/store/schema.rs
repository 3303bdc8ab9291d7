//! SQLite schema definition.

/// Schema of the durable snapshot store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Form Store (one row per key, value is the JSON snapshot blob)
-- ============================================================================

CREATE TABLE IF NOT EXISTS form_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
