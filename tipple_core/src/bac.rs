//! Widmark-style BAC estimation with linear elimination.
//!
//! Every function here is pure: BAC is re-derived from the total alcohol
//! load and elapsed time on every call, never carried forward.

use chrono::{DateTime, Utc};

/// BAC percentage points eliminated per hour
pub const ELIMINATION_RATE_PER_HOUR: f64 = 0.015;

/// Engine ceiling for BAC (not a physiological limit)
pub const MAX_BAC: f64 = 0.25;

/// Allowed body-water ratio range
pub const MIN_BODY_WATER_RATIO: f64 = 0.40;
pub const MAX_BODY_WATER_RATIO: f64 = 0.85;

/// Clamp a body-water ratio into the supported range
pub fn clamp_body_water_ratio(ratio: f64) -> f64 {
    ratio.clamp(MIN_BODY_WATER_RATIO, MAX_BODY_WATER_RATIO)
}

/// Elapsed hours from `start` to `now`; a start in the future counts as zero
pub fn hours_between(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let ms = (now - start).num_milliseconds().max(0);
    ms as f64 / 3_600_000.0
}

/// Elapsed minutes from `at` to `now`, clamped at zero
pub fn minutes_between(at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    hours_between(at, now) * 60.0
}

/// BAC contributed by `alcohol_grams` before any elimination, unclamped
///
/// Zero or negative body weight is a degenerate profile and yields zero.
pub fn bac_impact(alcohol_grams: f64, body_weight_kg: f64, body_water_ratio: f64) -> f64 {
    if body_weight_kg.is_nan() || body_weight_kg <= 0.0 || alcohol_grams <= 0.0 {
        return 0.0;
    }
    let weight_grams = (body_weight_kg * 1000.0).max(1.0);
    let ratio = clamp_body_water_ratio(body_water_ratio);
    (alcohol_grams / (weight_grams * ratio)) * 100.0
}

/// Estimated BAC after `hours_since_start` of elimination, in [0, MAX_BAC]
pub fn estimate_bac(
    total_alcohol_grams: f64,
    body_weight_kg: f64,
    body_water_ratio: f64,
    hours_since_start: f64,
) -> f64 {
    let before_elimination = bac_impact(total_alcohol_grams, body_weight_kg, body_water_ratio);
    let eliminated = ELIMINATION_RATE_PER_HOUR * hours_since_start.max(0.0);
    (before_elimination - eliminated).clamp(0.0, MAX_BAC)
}

/// BAC as a share of the engine ceiling, in [0, 100]
pub fn intoxication_percent(bac: f64) -> f64 {
    ((bac / MAX_BAC) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::to_ethanol_grams;
    use chrono::Duration;

    const WEIGHT: f64 = 70.0;
    const RATIO: f64 = 0.68;

    #[test]
    fn test_single_beer_at_start() {
        let grams = to_ethanol_grams(330.0, 4.5);
        let bac = estimate_bac(grams, WEIGHT, RATIO, 0.0);
        assert!((bac - 0.024_614).abs() < 1e-5, "bac was {bac}");
    }

    #[test]
    fn test_single_beer_two_hours_later_is_zero() {
        let grams = to_ethanol_grams(330.0, 4.5);
        assert_eq!(estimate_bac(grams, WEIGHT, RATIO, 2.0), 0.0);
    }

    #[test]
    fn test_four_beers_instantly() {
        let grams = 4.0 * to_ethanol_grams(330.0, 4.5);
        assert!((grams - 46.8666).abs() < 1e-3);
        let bac = estimate_bac(grams, WEIGHT, RATIO, 0.0);
        assert!((bac - 0.098_459).abs() < 1e-5, "bac was {bac}");
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let a = estimate_bac(30.0, WEIGHT, RATIO, 0.75);
        let b = estimate_bac(30.0, WEIGHT, RATIO, 0.75);
        assert_eq!(a, b);
    }

    #[test]
    fn test_monotonic_decay() {
        let grams = 60.0;
        let mut previous = estimate_bac(grams, WEIGHT, RATIO, 0.0);
        for step in 1..=40 {
            let current = estimate_bac(grams, WEIGHT, RATIO, step as f64 * 0.25);
            assert!(current <= previous);
            previous = current;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_clamped_to_ceiling() {
        let bac = estimate_bac(1_000.0, 50.0, 0.55, 0.0);
        assert_eq!(bac, MAX_BAC);
        assert_eq!(intoxication_percent(bac), 100.0);
    }

    #[test]
    fn test_clamp_invariant_over_grid() {
        for grams in [0.0, 5.0, 40.0, 200.0, 5_000.0] {
            for weight in [0.0, 0.0001, 45.0, 120.0] {
                for ratio in [0.1, 0.4, 0.68, 0.85, 2.0] {
                    for hours in [-3.0, 0.0, 1.5, 24.0] {
                        let bac = estimate_bac(grams, weight, ratio, hours);
                        assert!((0.0..=MAX_BAC).contains(&bac));
                        let pct = intoxication_percent(bac);
                        assert!((0.0..=100.0).contains(&pct));
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_body_weight_is_zero_bac() {
        assert_eq!(estimate_bac(20.0, 0.0, RATIO, 0.0), 0.0);
    }

    #[test]
    fn test_ratio_is_clamped() {
        let low = estimate_bac(10.0, WEIGHT, 0.1, 0.0);
        let floor = estimate_bac(10.0, WEIGHT, MIN_BODY_WATER_RATIO, 0.0);
        assert_eq!(low, floor);
    }

    #[test]
    fn test_hours_between_clamps_future_start() {
        let now = Utc::now();
        assert_eq!(hours_between(now + Duration::minutes(30), now), 0.0);
        assert!((hours_between(now - Duration::minutes(90), now) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_intoxication_percent() {
        assert_eq!(intoxication_percent(0.0), 0.0);
        assert!((intoxication_percent(0.125) - 50.0).abs() < 1e-9);
    }
}
