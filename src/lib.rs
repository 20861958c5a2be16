// Re-export core modules for use by the binary or other consumers
pub mod core;
pub mod goals;
pub mod journal;
pub mod persistence;
pub mod rules;
pub mod skills;
pub mod stats;

// Expose the main Codex wrapper and the types needed for interaction
pub use crate::core::codex::{Codex, CodexSummary};
pub use crate::persistence::{MemorySnapshotStore, SnapshotError, SnapshotStore, SqliteSnapshotStore};
