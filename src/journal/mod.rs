pub mod log;

pub use log::{Journal, ENTRIES_KEY};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque journal entry identifier, minted as a v4 UUID on add.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A free-text journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Creation parameters for [`Journal::add_entry`].
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub tags: Vec<String>,
}

/// Partial update for [`Journal::update_entry`]; `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub source: Option<String>,
    pub tags: Option<Vec<String>>,
}
