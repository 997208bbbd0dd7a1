//! SQLite-backed key-value store.
//!
//! Holds the persisted progression records in a single `kv` table at
//! `<data_dir>/focusquest.db`.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KeyValueStore};
use crate::error::{Result, StorageError};

/// SQLite database for durable key-value storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/focusquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("focusquest.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened progression database");
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Set several values in one transaction. Either every entry is
    /// written or none is.
    pub fn kv_set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)")?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete every stored record.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.kv_get(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Ok(self.kv_set(key, value)?)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        Ok(self.kv_set_many(entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn clear_removes_everything() {
        let mut db = Database::open_in_memory().unwrap();
        KeyValueStore::set(&mut db, "fq_xp", "10").unwrap();
        db.clear().unwrap();
        assert!(KeyValueStore::get(&db, "fq_xp").unwrap().is_none());
    }

    #[test]
    fn set_many_is_all_or_nothing() {
        let db = Database::open_in_memory().unwrap();
        db.kv_set_many(&[("fq_xp", "100"), ("fq_coins", "10")]).unwrap();
        db.conn()
            .execute_batch(
                "CREATE TRIGGER reject_coins BEFORE INSERT ON kv
                 WHEN NEW.key = 'fq_coins'
                 BEGIN SELECT RAISE(ABORT, 'coins rejected'); END;",
            )
            .unwrap();

        let err = db
            .kv_set_many(&[("fq_xp", "600"), ("fq_coins", "60")])
            .unwrap_err();
        assert!(matches!(err, StorageError::QueryFailed(_)));
        assert_eq!(db.kv_get("fq_xp").unwrap().as_deref(), Some("100"));
        assert_eq!(db.kv_get("fq_coins").unwrap().as_deref(), Some("10"));
    }

    #[test]
    fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focusquest.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.kv_set("fq_coins", "12").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.kv_get("fq_coins").unwrap().as_deref(), Some("12"));
    }
}
