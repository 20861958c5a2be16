use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::goals::{Goal, GoalDraft, GoalError, GoalId, GoalReward};
use crate::persistence::{SnapshotError, SnapshotStore};
use crate::skills::SkillRegistry;
use crate::stats::StatLedger;

pub const GOALS_KEY: &str = "codex-goals";

/// Cap on skills a single goal may reward; each linked skill receives the
/// full reward amount.
pub const MAX_SKILL_LINKS: usize = 16;

/// What a toggle did, for the caller's display layer.
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub goal_id: GoalId,
    pub is_complete: bool,
    pub reward_applied: bool,
}

/// Owner of the goal list and orchestrator of reward propagation. Holds
/// only ids into the stat ledger and skill registry, never their state.
#[derive(Debug, Clone, Default)]
pub struct GoalBook {
    goals: Vec<Goal>,
}

impl GoalBook {
    pub fn load(store: &dyn SnapshotStore) -> Result<Self, SnapshotError> {
        let Some(blob) = store.load(GOALS_KEY)? else {
            return Ok(Self::default());
        };
        let goals: Vec<Goal> = serde_json::from_str(&blob)?;
        Ok(Self { goals })
    }

    fn persist(&self, store: &mut dyn SnapshotStore) -> Result<(), SnapshotError> {
        let blob = serde_json::to_string(&self.goals)?;
        store.save(GOALS_KEY, &blob)
    }

    pub fn add_goal(
        &mut self,
        store: &mut dyn SnapshotStore,
        draft: GoalDraft,
    ) -> Result<GoalId, GoalError> {
        if draft.skill_ids.len() > MAX_SKILL_LINKS {
            return Err(GoalError::TooManySkillLinks {
                linked: draft.skill_ids.len(),
                max: MAX_SKILL_LINKS,
            });
        }
        let now = Utc::now();
        let id = GoalId(Uuid::new_v4().to_string());
        debug!(goal = %id, title = %draft.title, "goal added");
        self.goals.push(Goal {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            deadline: draft.deadline,
            reward: draft.reward,
            is_complete: false,
            created_at: now,
            updated_at: now,
            tags: draft.tags,
            skill_ids: draft.skill_ids,
        });
        self.persist(store)?;
        Ok(id)
    }

    /// Flip a goal's completion and propagate its reward: completing
    /// applies gains, un-completing applies the matching losses. The stat
    /// write, each skill write, and the goal write run sequentially, each
    /// with its own persistence; a failure partway leaves the partial
    /// state in place.
    pub fn toggle_complete(
        &mut self,
        store: &mut dyn SnapshotStore,
        stats: &mut StatLedger,
        skills: &mut SkillRegistry,
        id: &GoalId,
    ) -> Result<Option<ToggleOutcome>, SnapshotError> {
        let Some(goal) = self.goals.iter_mut().find(|goal| &goal.id == id) else {
            return Ok(None);
        };

        let was_complete = goal.is_complete;
        goal.is_complete = !goal.is_complete;
        goal.updated_at = Utc::now();

        let reward_applied = match goal.reward {
            GoalReward::Xp { stat, value } => {
                if !was_complete && goal.is_complete {
                    let source = format!("Goal: {}", goal.title);
                    if let Some(stat) = stat {
                        stats.gain_xp(store, stat, value, &source)?;
                    }
                    for skill_id in &goal.skill_ids {
                        skills.gain_xp(store, skill_id, value)?;
                    }
                } else {
                    let source = format!("Goal Undo: {}", goal.title);
                    if let Some(stat) = stat {
                        stats.lose_xp(store, stat, value, &source)?;
                    }
                    for skill_id in &goal.skill_ids {
                        skills.lose_xp(store, skill_id, value)?;
                    }
                }
                true
            }
            // Item rewards are not wired into any inventory yet.
            GoalReward::Item { .. } => false,
        };

        let outcome = ToggleOutcome {
            goal_id: goal.id.clone(),
            is_complete: goal.is_complete,
            reward_applied,
        };
        info!(
            goal = %goal.title,
            complete = goal.is_complete,
            reward_applied,
            linked_skills = goal.skill_ids.len(),
            "goal toggled"
        );
        self.persist(store)?;
        Ok(Some(outcome))
    }

    /// Remove a goal. Rewards already granted stay granted; only a
    /// toggle-back reverses them.
    pub fn delete_goal(
        &mut self,
        store: &mut dyn SnapshotStore,
        id: &GoalId,
    ) -> Result<(), SnapshotError> {
        self.goals.retain(|goal| &goal.id != id);
        self.persist(store)
    }

    pub fn get(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| &goal.id == id)
    }

    pub fn all(&self) -> &[Goal] {
        &self.goals
    }

    pub fn active(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|goal| !goal.is_complete).collect()
    }

    pub fn completed(&self) -> Vec<&Goal> {
        self.goals.iter().filter(|goal| goal.is_complete).collect()
    }

    pub fn sorted_by_deadline(&self) -> Vec<&Goal> {
        let mut sorted: Vec<&Goal> = self.goals.iter().collect();
        sorted.sort_by_key(|goal| goal.deadline);
        sorted
    }
}
