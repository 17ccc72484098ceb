//! SQLite-backed key-value store

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::host::db;
use crate::update::error::StoreError;
use crate::update::store::KeyValueStore;

pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(db::open(db_path)?),
        })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(db::open_in_memory()?),
        })
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock_conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            (key, value, db::now_ms()),
        )?;
        debug!("Stored value for key {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let store = SqliteKeyValueStore::in_memory().unwrap();

        assert_eq!(store.get_string("missing").unwrap(), None);
    }

    #[test]
    fn set_string_overwrites_previous_value() {
        let store = SqliteKeyValueStore::in_memory().unwrap();

        store.set_string("dismissed", "1.0.0").unwrap();
        store.set_string("dismissed", "1.1.0").unwrap();

        assert_eq!(
            store.get_string("dismissed").unwrap(),
            Some("1.1.0".to_string())
        );
    }

    #[test]
    fn values_survive_reopening_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("updater.db");

        SqliteKeyValueStore::new(&db_path)
            .unwrap()
            .set_string("dismissed", "2.0.0")
            .unwrap();

        let reopened = SqliteKeyValueStore::new(&db_path).unwrap();
        assert_eq!(
            reopened.get_string("dismissed").unwrap(),
            Some("2.0.0".to_string())
        );
    }
}
