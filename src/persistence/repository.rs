use std::fmt;

/// Whole-state blob store keyed by a fixed logical name per owner.
///
/// Each store persists by overwriting its entire snapshot on every
/// mutating call; there is no batching and no partial update.
pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, SnapshotError>;
    fn save(&mut self, key: &str, blob: &str) -> Result<(), SnapshotError>;
}

#[derive(Debug)]
pub enum SnapshotError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Sqlite(err) => write!(f, "sqlite error: {}", err),
            SnapshotError::Serde(err) => write!(f, "snapshot encoding error: {}", err),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<rusqlite::Error> for SnapshotError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}
