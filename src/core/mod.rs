pub mod codex;

pub use codex::{Codex, CodexSummary, SkillLine, StatLine};
