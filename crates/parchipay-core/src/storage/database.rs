//! SQLite-backed durable flag store.
//!
//! One kv table carries everything the app keeps across runs:
//! - reminder one-shot markers (presence-only keys)
//! - per-user read-notification-id sets (serialized JSON under one key)
//! - the notification ledger snapshot

use rusqlite::{params, Connection};

use crate::error::StoreError;
use crate::ledger::{NotificationLedger, ReadSet};
use crate::reminder::MarkerStore;

use super::data_dir;

const READ_IDS_KEY_PREFIX: &str = "read_notification_ids";
const LEDGER_KEY: &str = "notification_ledger";

/// SQLite database holding the kv store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/parchipay/parchipay.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?
            .join("parchipay.db");
        let conn = Connection::open(&path).map_err(|source| StoreError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(StoreError::from)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(StoreError::from)?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(StoreError::from)?;
        Ok(())
    }

    // ── Read-notification ids ────────────────────────────────────────

    /// Load a user's read-notification ids. Missing or corrupt stored
    /// state reads as the empty set.
    pub fn read_set(&self, user_id: &str) -> Result<ReadSet, StoreError> {
        let key = format!("{READ_IDS_KEY_PREFIX}-{user_id}");
        Ok(self
            .kv_get(&key)?
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    /// Persist a user's read-notification ids, replacing the stored copy.
    pub fn save_read_set(&self, user_id: &str, read: &ReadSet) -> Result<(), StoreError> {
        let key = format!("{READ_IDS_KEY_PREFIX}-{user_id}");
        let json =
            serde_json::to_string(read).map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        self.kv_set(&key, &json)
    }

    // ── Notification ledger ──────────────────────────────────────────

    /// Load the ledger snapshot. Missing or corrupt state reads as empty.
    pub fn ledger(&self) -> Result<NotificationLedger, StoreError> {
        Ok(self
            .kv_get(LEDGER_KEY)?
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default())
    }

    /// Persist the ledger snapshot.
    pub fn save_ledger(&self, ledger: &NotificationLedger) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(ledger).map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        self.kv_set(LEDGER_KEY, &json)
    }
}

impl MarkerStore for Database {
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.kv_get(key)?.is_some())
    }

    fn set(&self, key: &str) -> Result<(), StoreError> {
        self.kv_set(key, "true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn marker_store_round_trip() {
        let db = Database::open_memory().unwrap();
        assert!(!db.exists("reminder-committee-1-2024-8-2day").unwrap());
        db.set("reminder-committee-1-2024-8-2day").unwrap();
        assert!(db.exists("reminder-committee-1-2024-8-2day").unwrap());
    }

    #[test]
    fn read_set_round_trip_is_per_user() {
        let db = Database::open_memory().unwrap();
        let mut ledger = NotificationLedger::new();
        ledger.append("committee-1", "hello");

        let mut read = db.read_set("user-1").unwrap();
        assert!(read.is_empty());
        read.mark_all_read(ledger.entries());
        db.save_read_set("user-1", &read).unwrap();

        assert_eq!(db.read_set("user-1").unwrap().len(), 1);
        assert!(db.read_set("user-2").unwrap().is_empty());
    }

    #[test]
    fn ledger_round_trip() {
        let db = Database::open_memory().unwrap();
        assert!(db.ledger().unwrap().entries().is_empty());

        let mut ledger = db.ledger().unwrap();
        ledger.append("committee-1", "stored");
        db.save_ledger(&ledger).unwrap();

        let reloaded = db.ledger().unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].message, "stored");
    }
}
