//! SQLite schema for local preferences.

/// Preference database schema.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Preferences
-- ============================================================================

CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                         -- JSON value
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Notification switches.
pub const NOTIFICATION_PREFERENCES_KEY: &str = "notificationPreferences";

/// Display language code.
pub const LANGUAGE_KEY: &str = "language";

/// Dark mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Notification permission state.
pub const NOTIFICATION_PERMISSION_KEY: &str = "notificationPermission";

/// Locally recorded treatment outcomes.
pub const TREATMENT_RECORDS_KEY: &str = "treatmentRecords";
