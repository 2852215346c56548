//! Local preference storage.
//!
//! UI preferences (language, theme, notification switches) live on the
//! device, not on the zoo API. Values are stored as JSON in a single
//! key-value table.

mod schema;

pub use schema::*;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Preference store errors.
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PrefsResult<T> = Result<T, PrefsError>;

/// Key-value preference database.
pub struct PreferenceStore {
    conn: Connection,
}

impl PreferenceStore {
    /// Open store at path, creating the file and parent directory if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> PrefsResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Create in-memory store (for testing).
    pub fn open_in_memory() -> PrefsResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> PrefsResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Read a value; `None` when never written.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> PrefsResult<Option<T>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Read a value, falling back to `T::default()` when absent.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> PrefsResult<T> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Insert or replace a value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> PrefsResult<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, json],
        )?;
        Ok(())
    }

    /// Delete a value. Returns whether it existed.
    pub fn remove(&self, key: &str) -> PrefsResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM preferences WHERE key = ?", [key])?;
        Ok(rows > 0)
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> PrefsResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM preferences ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Default)]
    struct Probe {
        enabled: bool,
        count: u32,
    }

    #[test]
    fn test_open_in_memory() {
        let store = PreferenceStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_set_get_overwrite() {
        let store = PreferenceStore::open_in_memory().unwrap();
        assert_eq!(store.get::<Probe>("probe").unwrap(), None);

        store.set("probe", &Probe { enabled: true, count: 1 }).unwrap();
        store.set("probe", &Probe { enabled: false, count: 2 }).unwrap();
        assert_eq!(
            store.get::<Probe>("probe").unwrap(),
            Some(Probe { enabled: false, count: 2 })
        );
        assert_eq!(store.keys().unwrap(), vec!["probe".to_string()]);
    }

    #[test]
    fn test_get_or_default_and_remove() {
        let store = PreferenceStore::open_in_memory().unwrap();
        assert_eq!(store.get_or_default::<Probe>("missing").unwrap(), Probe::default());
        store.set(LANGUAGE_KEY, &"hi").unwrap();
        assert!(store.remove(LANGUAGE_KEY).unwrap());
        assert!(!store.remove(LANGUAGE_KEY).unwrap());
    }

    #[test]
    fn test_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.sqlite");
        {
            let store = PreferenceStore::open(&path).unwrap();
            store.set(DARK_MODE_KEY, &true).unwrap();
        }
        let store = PreferenceStore::open(&path).unwrap();
        assert_eq!(store.get::<bool>(DARK_MODE_KEY).unwrap(), Some(true));
    }
}
