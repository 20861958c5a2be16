pub mod registry;

pub use registry::{SkillRegistry, MAX_SKILL_LEVEL, SKILLS_KEY};

use serde::{Deserialize, Serialize};

use crate::goals::GoalId;
use crate::stats::StatName;

/// Opaque skill identifier. Minted as a v4 UUID for manually created
/// skills; callers may supply their own for programmatic creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillId(pub String);

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-defined skill with its own progression state.
///
/// `xp` is the XP accumulated within the current level, not a lifetime
/// total; `xp_curve_base` is fixed at creation from the registry's global
/// base scaled by difficulty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub description: String,
    pub stat_affected: StatName,
    pub difficulty: f64,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub xp_curve_base: f64,
    pub title: String,
    pub unlocked_paths: Vec<String>,
    pub related_goal_ids: Vec<GoalId>,
}

/// Creation parameters for [`SkillRegistry::add_skill`].
#[derive(Debug, Clone)]
pub struct SkillDraft {
    pub id: SkillId,
    pub name: String,
    pub description: String,
    pub stat_affected: StatName,
    pub difficulty: Option<f64>,
    pub unlocked_paths: Option<Vec<String>>,
    pub related_goal_ids: Option<Vec<GoalId>>,
}
