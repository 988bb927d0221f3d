//! SQLite-backed key-value storage.
//!
//! The whole persisted footprint of the engine is one small JSON document, so
//! the schema is a single `kv` table; SQLite supplies the atomicity the
//! persistence port promises.

use rusqlite::{params, Connection};

use super::data_dir;
use crate::error::Result;

/// SQLite database holding the engine's persisted document.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/pomotick/pomotick.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("pomotick.db");
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store, replacing any previous value atomically.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("engine_state").unwrap().is_none());
        db.kv_set("engine_state", "{}").unwrap();
        assert_eq!(db.kv_get("engine_state").unwrap().unwrap(), "{}");
    }

    #[test]
    fn kv_set_replaces() {
        let db = Database::open_memory().unwrap();
        db.kv_set("k", "old").unwrap();
        db.kv_set("k", "new").unwrap();
        assert_eq!(db.kv_get("k").unwrap().unwrap(), "new");
    }
}
