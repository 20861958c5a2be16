use tracing::debug;

use crate::goals::{GoalBook, GoalDraft, GoalError, GoalId, ToggleOutcome};
use crate::journal::{EntryDraft, EntryId, EntryPatch, Journal};
use crate::persistence::{SnapshotError, SnapshotStore};
use crate::skills::{SkillDraft, SkillId, SkillRegistry};
use crate::stats::{StatLedger, StatName};

/// Wrapper around the four stores and their injected snapshot store.
///
/// Every mutation goes through here so the borrow of the snapshot store is
/// threaded into the owning store; queries hand out references to the
/// stores themselves.
pub struct Codex {
    store: Box<dyn SnapshotStore>,
    stats: StatLedger,
    skills: SkillRegistry,
    goals: GoalBook,
    journal: Journal,
}

impl Codex {
    /// Load every snapshot from the store, default-filling whatever is
    /// missing, and assemble the engine.
    pub fn open(store: Box<dyn SnapshotStore>) -> Result<Self, SnapshotError> {
        let stats = StatLedger::load(store.as_ref())?;
        let skills = SkillRegistry::load(store.as_ref())?;
        let goals = GoalBook::load(store.as_ref())?;
        let journal = Journal::load(store.as_ref())?;
        debug!(
            goals = goals.all().len(),
            skills = skills.skills_list().len(),
            entries = journal.entries().len(),
            "codex opened"
        );
        Ok(Self {
            store,
            stats,
            skills,
            goals,
            journal,
        })
    }

    pub fn stats(&self) -> &StatLedger {
        &self.stats
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    pub fn goals(&self) -> &GoalBook {
        &self.goals
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn gain_stat_xp(
        &mut self,
        stat: StatName,
        amount: u32,
        source: &str,
    ) -> Result<(), SnapshotError> {
        self.stats
            .gain_xp(self.store.as_mut(), stat, amount, source)
    }

    pub fn lose_stat_xp(
        &mut self,
        stat: StatName,
        amount: u32,
        source: &str,
    ) -> Result<(), SnapshotError> {
        self.stats
            .lose_xp(self.store.as_mut(), stat, amount, source)
    }

    pub fn decay_stat_xp(&mut self, stat: StatName, amount: u32) -> Result<(), SnapshotError> {
        self.stats.decay_xp(self.store.as_mut(), stat, amount)
    }

    pub fn reset_stats(&mut self) -> Result<(), SnapshotError> {
        self.stats.reset(self.store.as_mut())
    }

    pub fn add_skill(&mut self, draft: SkillDraft) -> Result<(), SnapshotError> {
        self.skills.add_skill(self.store.as_mut(), draft)
    }

    pub fn create_skill(
        &mut self,
        name: &str,
        description: &str,
        stat_affected: StatName,
        difficulty: Option<f64>,
    ) -> Result<SkillId, SnapshotError> {
        self.skills
            .create_skill(self.store.as_mut(), name, description, stat_affected, difficulty)
    }

    pub fn discover_skill(&mut self, id: &SkillId) -> Result<(), SnapshotError> {
        self.skills.discover_skill(self.store.as_mut(), id)
    }

    pub fn select_skill(&mut self, id: Option<SkillId>) {
        self.skills.select_skill(id);
    }

    pub fn gain_skill_xp(&mut self, id: &SkillId, amount: u32) -> Result<(), SnapshotError> {
        self.skills.gain_xp(self.store.as_mut(), id, amount)
    }

    pub fn lose_skill_xp(&mut self, id: &SkillId, amount: u32) -> Result<(), SnapshotError> {
        self.skills.lose_xp(self.store.as_mut(), id, amount)
    }

    pub fn add_goal(&mut self, draft: GoalDraft) -> Result<GoalId, GoalError> {
        self.goals.add_goal(self.store.as_mut(), draft)
    }

    pub fn toggle_goal(&mut self, id: &GoalId) -> Result<Option<ToggleOutcome>, SnapshotError> {
        self.goals
            .toggle_complete(self.store.as_mut(), &mut self.stats, &mut self.skills, id)
    }

    pub fn delete_goal(&mut self, id: &GoalId) -> Result<(), SnapshotError> {
        self.goals.delete_goal(self.store.as_mut(), id)
    }

    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<EntryId, SnapshotError> {
        self.journal.add_entry(self.store.as_mut(), draft)
    }

    pub fn update_entry(&mut self, id: &EntryId, patch: EntryPatch) -> Result<(), SnapshotError> {
        self.journal.update_entry(self.store.as_mut(), id, patch)
    }

    pub fn remove_entry(&mut self, id: &EntryId) -> Result<(), SnapshotError> {
        self.journal.remove_entry(self.store.as_mut(), id)
    }

    /// Pure display snapshot for the UI layer.
    pub fn summary(&self) -> CodexSummary {
        let stats = self
            .stats
            .all()
            .into_iter()
            .map(|stat| StatLine {
                name: stat.name,
                level: self.stats.level_of(stat.name),
                progress: self.stats.progress_of(stat.name),
                xp: stat.xp,
            })
            .collect();
        let skills = self
            .skills
            .skills_list()
            .into_iter()
            .map(|skill| SkillLine {
                id: skill.id.clone(),
                name: skill.name.clone(),
                title: skill.title.clone(),
                level: skill.level,
                xp: skill.xp,
                xp_to_next: skill.xp_to_next,
            })
            .collect();
        CodexSummary {
            stats,
            skills,
            open_goals: self.goals.active().len(),
            completed_goals: self.goals.completed().len(),
            journal_entries: self.journal.entries().len(),
        }
    }
}

/// Data snapshot handed to the UI layer; owns everything it shows.
#[derive(Debug, Clone)]
pub struct CodexSummary {
    pub stats: Vec<StatLine>,
    pub skills: Vec<SkillLine>,
    pub open_goals: usize,
    pub completed_goals: usize,
    pub journal_entries: usize,
}

#[derive(Debug, Clone)]
pub struct StatLine {
    pub name: StatName,
    pub level: u32,
    pub progress: u32,
    pub xp: u32,
}

#[derive(Debug, Clone)]
pub struct SkillLine {
    pub id: SkillId,
    pub name: String,
    pub title: String,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::GoalReward;
    use crate::persistence::MemorySnapshotStore;
    use chrono::{Duration, Utc};

    #[test]
    fn empty_store_opens_with_defaults() {
        let codex = Codex::open(Box::new(MemorySnapshotStore::new())).unwrap();
        let summary = codex.summary();
        assert_eq!(summary.stats.len(), 6);
        assert!(summary.stats.iter().all(|line| line.xp == 0 && line.level == 1));
        assert!(summary.skills.is_empty());
        assert_eq!(summary.open_goals, 0);
        assert_eq!(summary.journal_entries, 0);
    }

    #[test]
    fn goal_toggle_drives_both_progressions_through_the_facade() {
        let mut codex = Codex::open(Box::new(MemorySnapshotStore::new())).unwrap();
        let skill = codex
            .create_skill("Spanish", "Daily flashcards", StatName::Intelligence, None)
            .unwrap();
        let goal = codex
            .add_goal(GoalDraft {
                title: "Finish unit five".to_string(),
                description: String::new(),
                deadline: Utc::now() + Duration::days(3),
                reward: GoalReward::Xp {
                    stat: Some(StatName::Intelligence),
                    value: 120,
                },
                tags: Vec::new(),
                skill_ids: vec![skill.clone()],
            })
            .unwrap();

        codex.toggle_goal(&goal).unwrap();
        assert_eq!(codex.stats().xp_of(StatName::Intelligence), 120);
        let learned = codex.skills().get(&skill).unwrap();
        assert_eq!(learned.level, 1);
        assert_eq!(learned.xp, 20);

        codex.toggle_goal(&goal).unwrap();
        assert_eq!(codex.stats().xp_of(StatName::Intelligence), 0);
        let undone = codex.skills().get(&skill).unwrap();
        assert_eq!(undone.level, 0);
        assert_eq!(undone.xp, 0);
    }

    #[test]
    fn state_survives_reopening_the_same_backing_file() {
        use crate::persistence::SqliteSnapshotStore;

        let path = std::env::temp_dir().join("life-codex-reopen-test.sqlite");
        let _ = std::fs::remove_file(&path);
        {
            let store = SqliteSnapshotStore::open(&path).unwrap();
            let mut codex = Codex::open(Box::new(store)).unwrap();
            codex
                .gain_stat_xp(StatName::Discipline, 140, "morning run")
                .unwrap();
        }
        let store = SqliteSnapshotStore::open(&path).unwrap();
        let reopened = Codex::open(Box::new(store)).unwrap();
        assert_eq!(reopened.stats().xp_of(StatName::Discipline), 140);
        assert_eq!(reopened.stats().level_of(StatName::Discipline), 2);
        let _ = std::fs::remove_file(&path);
    }
}
