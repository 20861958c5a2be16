use std::collections::HashMap;

use crate::persistence::repository::{SnapshotError, SnapshotStore};

/// In-memory snapshot store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    blobs: HashMap<String, String>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly, bypassing the engine. Test hook.
    pub fn insert(&mut self, key: &str, blob: &str) {
        self.blobs.insert(key.to_string(), blob.to_string());
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> Result<(), SnapshotError> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
