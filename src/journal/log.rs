use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::journal::{Entry, EntryDraft, EntryId, EntryPatch};
use crate::persistence::{SnapshotError, SnapshotStore};

pub const ENTRIES_KEY: &str = "codex-entries";

/// Owner of the journal entries, newest first.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<Entry>,
}

impl Journal {
    pub fn load(store: &dyn SnapshotStore) -> Result<Self, SnapshotError> {
        let Some(blob) = store.load(ENTRIES_KEY)? else {
            return Ok(Self::default());
        };
        let entries: Vec<Entry> = serde_json::from_str(&blob)?;
        Ok(Self { entries })
    }

    fn persist(&self, store: &mut dyn SnapshotStore) -> Result<(), SnapshotError> {
        let blob = serde_json::to_string(&self.entries)?;
        store.save(ENTRIES_KEY, &blob)
    }

    pub fn add_entry(
        &mut self,
        store: &mut dyn SnapshotStore,
        draft: EntryDraft,
    ) -> Result<EntryId, SnapshotError> {
        let id = EntryId(Uuid::new_v4().to_string());
        self.entries.insert(
            0,
            Entry {
                id: id.clone(),
                title: draft.title,
                summary: draft.summary,
                source: draft.source,
                tags: draft.tags,
                created_at: Utc::now(),
            },
        );
        self.persist(store)?;
        Ok(id)
    }

    /// Apply the non-empty fields of the patch. Unknown ids are a no-op
    /// and do not persist.
    pub fn update_entry(
        &mut self,
        store: &mut dyn SnapshotStore,
        id: &EntryId,
        patch: EntryPatch,
    ) -> Result<(), SnapshotError> {
        let Some(entry) = self.entries.iter_mut().find(|entry| &entry.id == id) else {
            return Ok(());
        };
        if let Some(title) = patch.title {
            entry.title = title;
        }
        if let Some(summary) = patch.summary {
            entry.summary = summary;
        }
        if let Some(source) = patch.source {
            entry.source = source;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        self.persist(store)
    }

    pub fn remove_entry(
        &mut self,
        store: &mut dyn SnapshotStore,
        id: &EntryId,
    ) -> Result<(), SnapshotError> {
        self.entries.retain(|entry| &entry.id != id);
        self.persist(store)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Distinct tags across all entries, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&str> = self
            .entries
            .iter()
            .flat_map(|entry| entry.tags.iter().map(String::as_str))
            .collect();
        tags.into_iter().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshotStore;

    fn draft(title: &str, tags: &[&str]) -> EntryDraft {
        EntryDraft {
            title: title.to_string(),
            summary: "summary".to_string(),
            source: "journal".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    #[test]
    fn newest_entry_sits_at_the_front() {
        let mut store = MemorySnapshotStore::new();
        let mut journal = Journal::default();
        journal.add_entry(&mut store, draft("first", &[])).unwrap();
        journal.add_entry(&mut store, draft("second", &[])).unwrap();
        let titles: Vec<&str> = journal.entries().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[test]
    fn patch_touches_only_provided_fields() {
        let mut store = MemorySnapshotStore::new();
        let mut journal = Journal::default();
        let id = journal
            .add_entry(&mut store, draft("draft title", &["a"]))
            .unwrap();
        journal
            .update_entry(
                &mut store,
                &id,
                EntryPatch {
                    summary: Some("rewritten".to_string()),
                    ..EntryPatch::default()
                },
            )
            .unwrap();

        let entry = journal.get(&id).unwrap();
        assert_eq!(entry.title, "draft title");
        assert_eq!(entry.summary, "rewritten");
        assert_eq!(entry.tags, vec!["a".to_string()]);
    }

    #[test]
    fn patching_an_unknown_id_changes_nothing() {
        let mut store = MemorySnapshotStore::new();
        let mut journal = Journal::default();
        journal
            .update_entry(
                &mut store,
                &EntryId("ghost".to_string()),
                EntryPatch {
                    title: Some("never".to_string()),
                    ..EntryPatch::default()
                },
            )
            .unwrap();
        assert!(journal.entries().is_empty());
        assert!(store.load(ENTRIES_KEY).unwrap().is_none());
    }

    #[test]
    fn removal_and_tag_listing() {
        let mut store = MemorySnapshotStore::new();
        let mut journal = Journal::default();
        let keep = journal
            .add_entry(&mut store, draft("keep", &["focus", "health"]))
            .unwrap();
        let drop = journal
            .add_entry(&mut store, draft("drop", &["focus", "noise"]))
            .unwrap();

        journal.remove_entry(&mut store, &drop).unwrap();
        assert!(journal.get(&drop).is_none());
        assert!(journal.get(&keep).is_some());
        assert_eq!(journal.all_tags(), vec!["focus", "health"]);
    }

    #[test]
    fn journal_round_trips_through_the_store() {
        let mut store = MemorySnapshotStore::new();
        let mut journal = Journal::default();
        journal
            .add_entry(&mut store, draft("kept across loads", &["tag"]))
            .unwrap();
        let reloaded = Journal::load(&store).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].title, "kept across loads");
    }
}
