pub mod curve;
pub mod titles;

pub use curve::xp_for_level;
pub use titles::{title_for_level, LEVEL_TITLES, UNKNOWN_TITLE};
