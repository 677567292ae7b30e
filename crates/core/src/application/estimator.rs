// Wait-Time Estimator
//
// Pure functions over a read snapshot; no I/O, no clock. The ledger feeds
// in either a count of active entries ahead (join/get path) or a rank
// within the active view (list path). Both agree for an entry that stays
// untouched between join and listing.

/// Estimated wait for an entry with `ahead` active entries in front of it
pub fn wait_for_ahead(ahead: i64, service_minutes: i64) -> i64 {
    ahead.max(0) * service_minutes.max(0)
}

/// Estimated wait for the entry at 0-indexed `rank` in the active view
pub fn wait_for_rank(rank: usize, service_minutes: i64) -> i64 {
    wait_for_ahead(rank as i64, service_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_is_rank_times_service_minutes() {
        assert_eq!(wait_for_rank(0, 5), 0);
        assert_eq!(wait_for_rank(1, 5), 5);
        assert_eq!(wait_for_rank(2, 5), 10);
    }

    #[test]
    fn wait_is_non_decreasing_with_rank() {
        let waits: Vec<i64> = (0..10).map(|rank| wait_for_rank(rank, 7)).collect();
        assert!(waits.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn negative_inputs_saturate_to_zero() {
        assert_eq!(wait_for_ahead(-3, 5), 0);
        assert_eq!(wait_for_ahead(3, -5), 0);
    }

    #[test]
    fn ahead_and_rank_agree_for_untouched_entries() {
        // An untouched entry's 0-indexed rank equals its ahead count
        for rank in 0..5 {
            assert_eq!(wait_for_ahead(rank as i64, 5), wait_for_rank(rank, 5));
        }
    }
}
