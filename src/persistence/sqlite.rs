use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::persistence::repository::{SnapshotError, SnapshotStore};

const SNAPSHOT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS snapshots (
  key TEXT PRIMARY KEY,
  blob TEXT NOT NULL,
  updated_at TEXT NOT NULL
);
"#;

/// Durable snapshot store backed by a single SQLite key/value table.
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SNAPSHOT_SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, SnapshotError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SNAPSHOT_SCHEMA)?;
        Ok(Self { conn })
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let blob = self
            .conn
            .query_row(
                "SELECT blob FROM snapshots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(blob)
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), SnapshotError> {
        self.conn.execute(
            "INSERT INTO snapshots (key, blob, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET blob = excluded.blob, updated_at = excluded.updated_at",
            params![key, blob, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_loads_as_none() {
        let store = SqliteSnapshotStore::open_in_memory().unwrap();
        assert!(store.load("codex-stats").unwrap().is_none());
    }

    #[test]
    fn saved_blob_round_trips() {
        let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
        store.save("codex-goals", "[]").unwrap();
        assert_eq!(store.load("codex-goals").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn save_overwrites_previous_blob() {
        let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
        store.save("codex-goals", "[]").unwrap();
        store.save("codex-goals", r#"[{"id":"g1"}]"#).unwrap();
        assert_eq!(
            store.load("codex-goals").unwrap().as_deref(),
            Some(r#"[{"id":"g1"}]"#)
        );
    }
}
