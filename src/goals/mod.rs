pub mod book;

pub use book::{GoalBook, ToggleOutcome, GOALS_KEY, MAX_SKILL_LINKS};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::SnapshotError;
use crate::skills::SkillId;
use crate::stats::StatName;

/// Opaque goal identifier, minted as a v4 UUID on add.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoalId(pub String);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reward attached to a goal. Item rewards are stored but never
/// propagated; the coordinator matches exhaustively so adding a new kind
/// forces a decision there.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GoalReward {
    Xp {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stat: Option<StatName>,
        value: u32,
    },
    Item {
        value: u32,
    },
}

/// A goal. Starts incomplete; `is_complete` only ever flips through
/// [`GoalBook::toggle_complete`], which applies or reverses the reward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub reward: GoalReward,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub skill_ids: Vec<SkillId>,
}

/// Creation parameters for [`GoalBook::add_goal`].
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub reward: GoalReward,
    pub tags: Vec<String>,
    pub skill_ids: Vec<SkillId>,
}

#[derive(Debug)]
pub enum GoalError {
    /// A draft linked more skills than any sane goal carries; the add is
    /// aborted with prior state untouched.
    TooManySkillLinks { linked: usize, max: usize },
    Snapshot(SnapshotError),
}

impl fmt::Display for GoalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalError::TooManySkillLinks { linked, max } => {
                write!(f, "goal links {} skills, at most {} allowed", linked, max)
            }
            GoalError::Snapshot(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GoalError {}

impl From<SnapshotError> for GoalError {
    fn from(err: SnapshotError) -> Self {
        Self::Snapshot(err)
    }
}
