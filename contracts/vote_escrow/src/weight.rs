/// Voting weight of a lock, linear in its duration.
///
/// Formula: weight = amount × lock_duration / max_lock
///
/// Example:
/// - amount: 1,067.5 units
/// - lock_duration: max_lock
/// - weight: 1,067.5
pub fn calculate_weight(amount: i128, lock_duration: u64, max_lock: u64) -> Option<i128> {
    if max_lock == 0 {
        return None;
    }
    amount
        .checked_mul(lock_duration as i128)?
        .checked_div(max_lock as i128)
}
