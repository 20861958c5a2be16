pub mod ledger;

pub use ledger::{StatLedger, STATS_KEY, XP_PER_LEVEL};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six fixed character stats. The set never grows or shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatName {
    Intelligence,
    Strength,
    Discipline,
    Wisdom,
    Charisma,
    Resilience,
}

impl StatName {
    pub const ALL: [StatName; 6] = [
        StatName::Intelligence,
        StatName::Strength,
        StatName::Discipline,
        StatName::Wisdom,
        StatName::Charisma,
        StatName::Resilience,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatName::Intelligence => "Intelligence",
            StatName::Strength => "Strength",
            StatName::Discipline => "Discipline",
            StatName::Wisdom => "Wisdom",
            StatName::Charisma => "Charisma",
            StatName::Resilience => "Resilience",
        }
    }

    pub fn parse(value: &str) -> Option<StatName> {
        StatName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for StatName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stat's accumulated raw XP. Level and progress are derived on read,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub name: StatName,
    pub xp: u32,
    pub last_updated: DateTime<Utc>,
}

/// Append-only record of a single XP delta with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatHistoryEntry {
    pub stat: StatName,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}
