/// Display titles for skill levels 1 through 10, in ascending order.
pub const LEVEL_TITLES: [&str; 10] = [
    "Beginner",
    "Apprentice",
    "Journeyman",
    "Adept",
    "Expert",
    "Specialist",
    "Master",
    "High Master",
    "Sage",
    "Grandmaster",
];

/// Fallback title for any level outside the table.
pub const UNKNOWN_TITLE: &str = "???";

/// Title for a recomputed level. Level 0 has no table entry; a freshly
/// created skill is titled from the first table entry instead.
pub fn title_for_level(level: u32) -> &'static str {
    match level.checked_sub(1) {
        Some(index) => LEVEL_TITLES
            .get(index as usize)
            .copied()
            .unwrap_or(UNKNOWN_TITLE),
        None => UNKNOWN_TITLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_cover_levels_one_to_ten() {
        assert_eq!(title_for_level(1), "Beginner");
        assert_eq!(title_for_level(5), "Expert");
        assert_eq!(title_for_level(10), "Grandmaster");
    }

    #[test]
    fn level_zero_falls_back_to_unknown() {
        assert_eq!(title_for_level(0), UNKNOWN_TITLE);
    }
}
