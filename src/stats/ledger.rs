use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::persistence::{SnapshotError, SnapshotStore};
use crate::stats::{Stat, StatHistoryEntry, StatName};

pub const STATS_KEY: &str = "codex-stats";

/// Fixed divisor for stat leveling: every 100 raw XP is one level.
pub const XP_PER_LEVEL: u32 = 100;

/// Owner of all stat and stat-history data. Levels are pure derivations of
/// raw XP; losses clamp at zero while the history records the requested
/// amount, so a clamped loss can record more than was actually removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatLedger {
    #[serde(default = "default_stats")]
    stats: HashMap<StatName, Stat>,
    #[serde(default)]
    history: Vec<StatHistoryEntry>,
}

fn default_stats() -> HashMap<StatName, Stat> {
    let now = Utc::now();
    StatName::ALL
        .into_iter()
        .map(|name| {
            (
                name,
                Stat {
                    name,
                    xp: 0,
                    last_updated: now,
                },
            )
        })
        .collect()
}

impl Default for StatLedger {
    fn default() -> Self {
        Self {
            stats: default_stats(),
            history: Vec::new(),
        }
    }
}

impl StatLedger {
    /// Load the ledger from its snapshot, default-filling any stat an older
    /// snapshot is missing so the six-stat invariant holds after every load.
    pub fn load(store: &dyn SnapshotStore) -> Result<Self, SnapshotError> {
        let Some(blob) = store.load(STATS_KEY)? else {
            return Ok(Self::default());
        };
        let mut ledger: StatLedger = serde_json::from_str(&blob)?;
        for (name, stat) in default_stats() {
            ledger.stats.entry(name).or_insert(stat);
        }
        Ok(ledger)
    }

    fn persist(&self, store: &mut dyn SnapshotStore) -> Result<(), SnapshotError> {
        let blob = serde_json::to_string(self)?;
        store.save(STATS_KEY, &blob)
    }

    pub fn gain_xp(
        &mut self,
        store: &mut dyn SnapshotStore,
        stat: StatName,
        amount: u32,
        source: &str,
    ) -> Result<(), SnapshotError> {
        let Some(entry) = self.stats.get_mut(&stat) else {
            return Ok(());
        };
        let now = Utc::now();
        entry.xp = entry.xp.saturating_add(amount);
        entry.last_updated = now;
        self.history.push(StatHistoryEntry {
            stat,
            amount: i64::from(amount),
            timestamp: now,
            source: source.to_string(),
        });
        self.persist(store)
    }

    pub fn lose_xp(
        &mut self,
        store: &mut dyn SnapshotStore,
        stat: StatName,
        amount: u32,
        source: &str,
    ) -> Result<(), SnapshotError> {
        let Some(entry) = self.stats.get_mut(&stat) else {
            return Ok(());
        };
        let now = Utc::now();
        entry.xp = entry.xp.saturating_sub(amount);
        entry.last_updated = now;
        self.history.push(StatHistoryEntry {
            stat,
            amount: -i64::from(amount),
            timestamp: now,
            source: source.to_string(),
        });
        self.persist(store)
    }

    /// Quiet decrement for time decay: applies only when the stat can cover
    /// the full amount, and leaves no history entry.
    pub fn decay_xp(
        &mut self,
        store: &mut dyn SnapshotStore,
        stat: StatName,
        amount: u32,
    ) -> Result<(), SnapshotError> {
        let Some(entry) = self.stats.get_mut(&stat) else {
            return Ok(());
        };
        if entry.xp < amount {
            return Ok(());
        }
        entry.xp -= amount;
        self.persist(store)
    }

    pub fn reset(&mut self, store: &mut dyn SnapshotStore) -> Result<(), SnapshotError> {
        self.stats = default_stats();
        self.history.clear();
        self.persist(store)
    }

    pub fn xp_of(&self, stat: StatName) -> u32 {
        self.stats.get(&stat).map_or(0, |entry| entry.xp)
    }

    pub fn level_of(&self, stat: StatName) -> u32 {
        self.xp_of(stat) / XP_PER_LEVEL + 1
    }

    pub fn progress_of(&self, stat: StatName) -> u32 {
        self.xp_of(stat) % XP_PER_LEVEL
    }

    /// All six stats in declaration order.
    pub fn all(&self) -> Vec<&Stat> {
        StatName::ALL
            .iter()
            .filter_map(|name| self.stats.get(name))
            .collect()
    }

    pub fn history(&self) -> &[StatHistoryEntry] {
        &self.history
    }

    pub fn history_of(&self, stat: StatName) -> Vec<&StatHistoryEntry> {
        self.history
            .iter()
            .filter(|entry| entry.stat == stat)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshotStore;

    #[test]
    fn gain_then_lose_restores_xp() {
        let mut store = MemorySnapshotStore::new();
        let mut ledger = StatLedger::default();
        ledger
            .gain_xp(&mut store, StatName::Wisdom, 250, "test")
            .unwrap();
        ledger
            .lose_xp(&mut store, StatName::Wisdom, 250, "test")
            .unwrap();
        assert_eq!(ledger.xp_of(StatName::Wisdom), 0);
    }

    #[test]
    fn losses_clamp_at_zero() {
        let mut store = MemorySnapshotStore::new();
        let mut ledger = StatLedger::default();
        ledger
            .gain_xp(&mut store, StatName::Strength, 30, "test")
            .unwrap();
        ledger
            .lose_xp(&mut store, StatName::Strength, 90, "test")
            .unwrap();
        ledger
            .lose_xp(&mut store, StatName::Strength, 90, "test")
            .unwrap();
        assert_eq!(ledger.xp_of(StatName::Strength), 0);
    }

    #[test]
    fn clamped_loss_still_records_requested_amount() {
        let mut store = MemorySnapshotStore::new();
        let mut ledger = StatLedger::default();
        ledger
            .gain_xp(&mut store, StatName::Charisma, 10, "test")
            .unwrap();
        ledger
            .lose_xp(&mut store, StatName::Charisma, 40, "test")
            .unwrap();
        let history = ledger.history_of(StatName::Charisma);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].amount, 10);
        assert_eq!(history[1].amount, -40);
    }

    #[test]
    fn level_and_progress_derive_from_xp() {
        let mut store = MemorySnapshotStore::new();
        let mut ledger = StatLedger::default();
        assert_eq!(ledger.level_of(StatName::Intelligence), 1);
        ledger
            .gain_xp(&mut store, StatName::Intelligence, 250, "test")
            .unwrap();
        assert_eq!(ledger.level_of(StatName::Intelligence), 3);
        assert_eq!(ledger.progress_of(StatName::Intelligence), 50);
    }

    #[test]
    fn decay_only_applies_when_fully_covered() {
        let mut store = MemorySnapshotStore::new();
        let mut ledger = StatLedger::default();
        ledger
            .gain_xp(&mut store, StatName::Discipline, 50, "test")
            .unwrap();
        ledger
            .decay_xp(&mut store, StatName::Discipline, 80)
            .unwrap();
        assert_eq!(ledger.xp_of(StatName::Discipline), 50);
        ledger
            .decay_xp(&mut store, StatName::Discipline, 20)
            .unwrap();
        assert_eq!(ledger.xp_of(StatName::Discipline), 30);
        // Decay is quiet: only the gain shows up in history.
        assert_eq!(ledger.history_of(StatName::Discipline).len(), 1);
    }

    #[test]
    fn reset_zeroes_stats_and_clears_history() {
        let mut store = MemorySnapshotStore::new();
        let mut ledger = StatLedger::default();
        ledger
            .gain_xp(&mut store, StatName::Resilience, 400, "test")
            .unwrap();
        ledger.reset(&mut store).unwrap();
        assert_eq!(ledger.xp_of(StatName::Resilience), 0);
        assert!(ledger.history().is_empty());
        assert_eq!(ledger.all().len(), 6);
    }

    #[test]
    fn partial_snapshot_default_fills_missing_stats() {
        let mut store = MemorySnapshotStore::new();
        store.insert(
            STATS_KEY,
            r#"{"stats":{"Strength":{"name":"Strength","xp":120,"lastUpdated":"2026-01-05T10:00:00Z"}}}"#,
        );
        let ledger = StatLedger::load(&store).unwrap();
        assert_eq!(ledger.xp_of(StatName::Strength), 120);
        assert_eq!(ledger.xp_of(StatName::Wisdom), 0);
        assert_eq!(ledger.all().len(), 6);
        assert!(ledger.history().is_empty());
    }

    #[test]
    fn mutations_write_through_to_the_store() {
        let mut store = MemorySnapshotStore::new();
        let mut ledger = StatLedger::default();
        ledger
            .gain_xp(&mut store, StatName::Wisdom, 75, "reading")
            .unwrap();
        let reloaded = StatLedger::load(&store).unwrap();
        assert_eq!(reloaded.xp_of(StatName::Wisdom), 75);
        assert_eq!(reloaded.history_of(StatName::Wisdom).len(), 1);
        assert_eq!(reloaded.history_of(StatName::Wisdom)[0].source, "reading");
    }
}
