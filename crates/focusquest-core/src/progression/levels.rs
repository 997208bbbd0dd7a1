//! Level derivation from cumulative experience.
//!
//! Levels are never stored; they are a pure function of experience against
//! a fixed ascending threshold table (index = level - 1).

/// Experience needed to reach each level. Level 5 (1000 XP) and level 15
/// (10500 XP) are milestone ranks; the table must not be retuned casually.
pub const LEVEL_THRESHOLDS: [u64; 20] = [
    0, 100, 300, 600, 1000, // 1-5
    1500, 2100, 2800, 3600, 4500, // 6-10
    5500, 6600, 7800, 9100, 10500, // 11-15
    12000, 13600, 15300, 17100, 19000, // 16-20
];

/// Width of the band past the last tabulated threshold.
pub const EXTRAPOLATION_STEP: u64 = 1000;

/// 1-based level: the number of thresholds not exceeding `experience`.
pub fn level_for(experience: u64) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .take_while(|&&threshold| threshold <= experience)
        .count() as u32
}

/// Experience at which `level` starts. Levels below 1 are treated as 1.
pub fn threshold_for(level: u32) -> u64 {
    let idx = level.max(1) as usize - 1;
    LEVEL_THRESHOLDS.get(idx).copied().unwrap_or_else(|| {
        let last = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
        let extra = (idx - (LEVEL_THRESHOLDS.len() - 1)) as u64;
        last.saturating_add(extra.saturating_mul(EXTRAPOLATION_STEP))
    })
}

/// Experience at which the level after `level` starts.
pub fn next_threshold(level: u32) -> u64 {
    threshold_for(level.max(1).saturating_add(1))
}

/// Percentage through the current level band, clamped to `[0, 100]`.
pub fn progress_percent(experience: u64) -> f64 {
    let level = level_for(experience);
    let current = threshold_for(level);
    let next = next_threshold(level);
    let span = next.saturating_sub(current);
    if span == 0 {
        return 100.0;
    }
    let pct = experience.saturating_sub(current) as f64 / span as f64 * 100.0;
    pct.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds_strictly_increase_from_zero() {
        assert_eq!(LEVEL_THRESHOLDS[0], 0);
        assert!(LEVEL_THRESHOLDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(250), 2);
        assert_eq!(level_for(300), 3);
        assert_eq!(level_for(1000), 5);
        assert_eq!(level_for(10_499), 14);
        assert_eq!(level_for(10_500), 15);
        assert_eq!(level_for(19_000), 20);
        assert_eq!(level_for(u64::MAX), 20);
    }

    #[test]
    fn progress_at_band_start_is_zero() {
        assert_eq!(progress_percent(0), 0.0);
        assert_eq!(progress_percent(100), 0.0);
        assert_eq!(progress_percent(4500), 0.0);
    }

    #[test]
    fn progress_just_below_next_threshold() {
        let pct = progress_percent(299);
        assert!(pct < 100.0 && pct > 99.0, "got {pct}");
        assert_eq!(progress_percent(200), 50.0);
    }

    #[test]
    fn progress_extrapolates_past_table() {
        assert_eq!(next_threshold(20), 20_000);
        assert_eq!(progress_percent(19_500), 50.0);
        assert_eq!(progress_percent(25_000), 100.0);
    }

    proptest! {
        #[test]
        fn level_never_decreases_with_more_experience(
            xp in 0u64..30_000,
            extra in 0u64..5_000,
        ) {
            prop_assert!(level_for(xp) <= level_for(xp + extra));
        }

        #[test]
        fn progress_stays_in_range(xp in 0u64..50_000) {
            let pct = progress_percent(xp);
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }
}
