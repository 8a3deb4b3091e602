//! Interval fuzzing.
//!
//! Cards introduced together would otherwise keep coming due on the same
//! day. The jitter is drawn from a generator seeded by the card and the
//! review time, so replaying a card's history yields the same intervals.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Intervals shorter than this are never fuzzed.
pub const MIN_FUZZ_INTERVAL: f64 = 2.5;

/// (start, end, factor): share of the interval inside each band that may be fuzzed.
const FUZZ_RANGES: [(f64, f64, f64); 3] = [
    (2.5, 7.0, 0.15),
    (7.0, 20.0, 0.1),
    (20.0, f64::INFINITY, 0.05),
];

/// Seed for the fuzz generator of one review.
pub fn seed(card_id: i64, now: DateTime<Utc>) -> u64 {
    (card_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (now.timestamp_millis() as u64)
}

/// Half-width (in days) of the fuzz range around `interval`.
pub fn fuzz_delta(interval: f64) -> f64 {
    FUZZ_RANGES.iter().fold(1.0, |delta, &(start, end, factor)| {
        delta + factor * (interval.min(end) - start).max(0.0)
    })
}

/// Inclusive range of whole days `interval` may be fuzzed to.
pub fn fuzz_range(interval: f64, maximum_interval_days: i64) -> (i64, i64) {
    let max = maximum_interval_days.max(1);
    if interval < MIN_FUZZ_INTERVAL {
        let days = (interval.round() as i64).clamp(1, max);
        return (days, days);
    }

    let delta = fuzz_delta(interval);
    let upper = ((interval + delta).round() as i64).clamp(1, max);
    let lower = ((interval - delta).round() as i64).max(2).min(upper);
    (lower, upper)
}

/// Pick a whole-day interval near `interval`, within `[1, maximum_interval_days]`.
pub fn fuzz_interval(interval: f64, maximum_interval_days: i64, seed: u64) -> i64 {
    let (lower, upper) = fuzz_range(interval, maximum_interval_days);
    if lower == upper {
        return lower;
    }
    StdRng::seed_from_u64(seed).gen_range(lower..=upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_intervals_are_not_fuzzed() {
        assert_eq!(fuzz_range(1.0, 36500), (1, 1));
        assert_eq!(fuzz_range(2.2, 36500), (2, 2));
        for seed in 0..50 {
            assert_eq!(fuzz_interval(2.0, 36500, seed), 2);
        }
    }

    #[test]
    fn delta_grows_slower_for_long_intervals() {
        assert!((fuzz_delta(2.5) - 1.0).abs() < 1e-9);
        assert!((fuzz_delta(7.0) - (1.0 + 0.15 * 4.5)).abs() < 1e-9);
        assert!((fuzz_delta(100.0) - (1.0 + 0.675 + 1.3 + 4.0)).abs() < 1e-9);
    }

    #[test]
    fn fuzzed_interval_stays_in_range() {
        for interval in [3.0, 8.0, 25.0, 400.0, 36500.0] {
            let (lower, upper) = fuzz_range(interval, 36500);
            for seed in 0..200 {
                let days = fuzz_interval(interval, 36500, seed);
                assert!(days >= lower && days <= upper, "{interval}: {days}");
                assert!((1..=36500).contains(&days));
            }
        }
    }

    #[test]
    fn fuzz_never_exceeds_maximum() {
        for seed in 0..200 {
            assert!(fuzz_interval(30.0, 30, seed) <= 30);
            assert_eq!(fuzz_interval(5.0, 1, seed), 1);
        }
    }

    #[test]
    fn same_seed_same_interval() {
        let a = fuzz_interval(50.0, 36500, 42);
        let b = fuzz_interval(50.0, 36500, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn fuzz_spreads_intervals() {
        let distinct: std::collections::HashSet<i64> =
            (0..100).map(|seed| fuzz_interval(50.0, 36500, seed)).collect();
        assert!(distinct.len() > 1);
    }
}
