use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::persistence::{SnapshotError, SnapshotStore};
use crate::rules::{title_for_level, xp_for_level, LEVEL_TITLES};
use crate::skills::{Skill, SkillDraft, SkillId};
use crate::stats::StatName;

pub const SKILLS_KEY: &str = "codex-skills-v2";

/// Skills stop leveling here; XP keeps accumulating past the cap.
pub const MAX_SKILL_LEVEL: u32 = 10;

/// Levels that append an unlock marker when crossed. Crossing the same
/// level again after a loss appends a duplicate; that is accepted.
const UNLOCK_LEVELS: [u32; 3] = [3, 5, 8];

fn default_curve_base() -> f64 {
    100.0
}

/// Owner of all skill data. A skill is only visible in list views once its
/// id is on the discovered list; discovery is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRegistry {
    #[serde(default)]
    skills: HashMap<SkillId, Skill>,
    #[serde(default)]
    discovered_skill_ids: Vec<SkillId>,
    #[serde(default = "default_curve_base")]
    xp_curve_base: f64,
    #[serde(skip)]
    selected_skill_id: Option<SkillId>,
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self {
            skills: HashMap::new(),
            discovered_skill_ids: Vec::new(),
            xp_curve_base: default_curve_base(),
            selected_skill_id: None,
        }
    }
}

impl SkillRegistry {
    pub fn load(store: &dyn SnapshotStore) -> Result<Self, SnapshotError> {
        let Some(blob) = store.load(SKILLS_KEY)? else {
            return Ok(Self::default());
        };
        Ok(serde_json::from_str(&blob)?)
    }

    fn persist(&self, store: &mut dyn SnapshotStore) -> Result<(), SnapshotError> {
        let blob = serde_json::to_string(self)?;
        store.save(SKILLS_KEY, &blob)
    }

    /// Idempotent create: an existing id is left untouched. The new skill
    /// starts at level 0 with the threshold for level 1 ahead of it, and is
    /// discovered immediately.
    pub fn add_skill(
        &mut self,
        store: &mut dyn SnapshotStore,
        draft: SkillDraft,
    ) -> Result<(), SnapshotError> {
        if self.skills.contains_key(&draft.id) {
            return Ok(());
        }
        let difficulty = draft.difficulty.unwrap_or(1.0);
        let base = self.xp_curve_base * difficulty;
        let skill = Skill {
            id: draft.id.clone(),
            name: draft.name,
            description: draft.description,
            stat_affected: draft.stat_affected,
            difficulty,
            level: 0,
            xp: 0,
            xp_to_next: xp_for_level(1, base),
            xp_curve_base: base,
            title: LEVEL_TITLES[0].to_string(),
            unlocked_paths: draft.unlocked_paths.unwrap_or_default(),
            related_goal_ids: draft.related_goal_ids.unwrap_or_default(),
        };
        let id = draft.id;
        self.skills.insert(id.clone(), skill);
        if !self.discovered_skill_ids.contains(&id) {
            self.discovered_skill_ids.push(id);
        }
        self.persist(store)
    }

    /// Manual creation path: mints an id, registers, and returns it.
    pub fn create_skill(
        &mut self,
        store: &mut dyn SnapshotStore,
        name: &str,
        description: &str,
        stat_affected: StatName,
        difficulty: Option<f64>,
    ) -> Result<SkillId, SnapshotError> {
        let id = SkillId(Uuid::new_v4().to_string());
        self.add_skill(
            store,
            SkillDraft {
                id: id.clone(),
                name: name.to_string(),
                description: description.to_string(),
                stat_affected,
                difficulty,
                unlocked_paths: None,
                related_goal_ids: None,
            },
        )?;
        Ok(id)
    }

    pub fn discover_skill(
        &mut self,
        store: &mut dyn SnapshotStore,
        id: &SkillId,
    ) -> Result<(), SnapshotError> {
        if self.discovered_skill_ids.contains(id) {
            return Ok(());
        }
        self.discovered_skill_ids.push(id.clone());
        self.persist(store)
    }

    /// Transient UI selection; not part of the snapshot.
    pub fn select_skill(&mut self, id: Option<SkillId>) {
        self.selected_skill_id = id;
    }

    pub fn gain_xp(
        &mut self,
        store: &mut dyn SnapshotStore,
        id: &SkillId,
        amount: u32,
    ) -> Result<(), SnapshotError> {
        let Some(skill) = self.skills.get_mut(id) else {
            return Ok(());
        };
        skill.xp = skill.xp.saturating_add(amount);
        while skill.xp >= skill.xp_to_next && skill.level < MAX_SKILL_LEVEL {
            skill.level += 1;
            skill.title = title_for_level(skill.level).to_string();
            skill.xp -= skill.xp_to_next;
            skill.xp_to_next = xp_for_level(skill.level + 1, skill.xp_curve_base);
            check_for_unlocks(skill);
        }
        self.persist(store)
    }

    /// XP loss recomputes the level from scratch instead of decrementing:
    /// the within-level XP is clamped down by `amount`, and the remainder is
    /// re-walked from level 0 through successive thresholds as if it were
    /// cumulative XP. Not the inverse of `gain_xp`; stat losses use a plain
    /// clamped decrement instead.
    pub fn lose_xp(
        &mut self,
        store: &mut dyn SnapshotStore,
        id: &SkillId,
        amount: u32,
    ) -> Result<(), SnapshotError> {
        let Some(skill) = self.skills.get_mut(id) else {
            return Ok(());
        };
        skill.xp = skill.xp.saturating_sub(amount);

        let mut level = 0;
        let mut required = xp_for_level(1, skill.xp_curve_base);
        while required <= skill.xp && level < MAX_SKILL_LEVEL {
            skill.xp -= required;
            level += 1;
            required = xp_for_level(level + 1, skill.xp_curve_base);
        }

        skill.level = level;
        skill.title = title_for_level(level).to_string();
        skill.xp_to_next = required;
        self.persist(store)
    }

    pub fn get(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.get(id)
    }

    pub fn selected_skill(&self) -> Option<&Skill> {
        self.selected_skill_id
            .as_ref()
            .and_then(|id| self.skills.get(id))
    }

    /// Discovered skills, in discovery order.
    pub fn skills_list(&self) -> Vec<&Skill> {
        self.discovered_skill_ids
            .iter()
            .filter_map(|id| self.skills.get(id))
            .collect()
    }

    pub fn xp_curve_base(&self) -> f64 {
        self.xp_curve_base
    }
}

fn check_for_unlocks(skill: &mut Skill) {
    if UNLOCK_LEVELS.contains(&skill.level) {
        skill
            .unlocked_paths
            .push(format!("Path unlocked at level {}", skill.level));
    }
}
