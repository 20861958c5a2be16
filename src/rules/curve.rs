/// XP required to advance into `level`, for a curve anchored at `base`.
///
/// Both progression systems share this curve: skills call it with their own
/// difficulty-scaled base, the stat ledger's implicit 100-per-level divisor
/// is the same curve flattened to its base. Callers always pass
/// `current_level + 1`; level 0 never reaches this function.
pub fn xp_for_level(level: u32, base: f64) -> u32 {
    (base * f64::from(level).powf(1.5)).floor() as u32
}
