pub mod memory;
pub mod repository;
pub mod sqlite;

pub use memory::MemorySnapshotStore;
pub use repository::{SnapshotError, SnapshotStore};
pub use sqlite::SqliteSnapshotStore;
