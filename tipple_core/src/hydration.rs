//! Time-decayed hydration score and the modifiers derived from it.

use crate::bac::minutes_between;
use crate::HydrationEvent;
use chrono::{DateTime, Utc};

/// Water older than this no longer counts
pub const HYDRATION_WINDOW_MINUTES: f64 = 60.0;

/// Direct BAC offset per glass, used only by the compatibility policy
pub const HYDRATION_SHIFT_PER_GLASS: f64 = 0.0015;
pub const MAX_HYDRATION_SHIFT: f64 = 0.02;

/// Sum of water volume weighted linearly by freshness within the window
///
/// Water logged in the future counts as just drunk.
pub fn hydration_score(events: &[HydrationEvent], now: DateTime<Utc>) -> f64 {
    events
        .iter()
        .filter_map(|event| {
            let age = minutes_between(event.timestamp, now);
            if age > HYDRATION_WINDOW_MINUTES {
                return None;
            }
            Some(event.volume_ml * (1.0 - age / HYDRATION_WINDOW_MINUTES).max(0.0))
        })
        .sum()
}

/// Rest-time multiplier; poor hydration lengthens the recommended rest
pub fn hydration_modifier(score: f64) -> f64 {
    if score >= 800.0 {
        0.90
    } else if score >= 400.0 {
        1.00
    } else {
        1.15
    }
}

/// Servings of water logged so far (quantities summed)
pub fn water_glasses(events: &[HydrationEvent]) -> f64 {
    events.iter().map(|e| e.quantity).sum()
}

/// Capped BAC reduction for the direct-offset policy
pub fn hydration_shift(events: &[HydrationEvent]) -> f64 {
    (water_glasses(events) * HYDRATION_SHIFT_PER_GLASS).min(MAX_HYDRATION_SHIFT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn water(volume_ml: f64, minutes_ago: i64, now: DateTime<Utc>) -> HydrationEvent {
        HydrationEvent::new(
            "bottle_500",
            1.0,
            volume_ml,
            now - Duration::minutes(minutes_ago),
        )
        .unwrap()
    }

    #[test]
    fn test_half_hour_old_bottle() {
        let now = Utc::now();
        let score = hydration_score(&[water(500.0, 30, now)], now);
        assert!((score - 250.0).abs() < 1e-6);
        assert_eq!(hydration_modifier(score), 1.15);
    }

    #[test]
    fn test_window_cutoff() {
        let now = Utc::now();
        assert_eq!(hydration_score(&[water(500.0, 61, now)], now), 0.0);
        assert_eq!(hydration_score(&[water(500.0, 60, now)], now), 0.0);
        assert!((hydration_score(&[water(500.0, 0, now)], now) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_future_water_counts_fully() {
        let now = Utc::now();
        let score = hydration_score(&[water(300.0, -20, now)], now);
        assert!((score - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_modifier_thresholds() {
        assert_eq!(hydration_modifier(0.0), 1.15);
        assert_eq!(hydration_modifier(399.9), 1.15);
        assert_eq!(hydration_modifier(400.0), 1.00);
        assert_eq!(hydration_modifier(799.9), 1.00);
        assert_eq!(hydration_modifier(800.0), 0.90);
    }

    #[test]
    fn test_hydration_shift_is_capped() {
        let now = Utc::now();
        let few: Vec<_> = (0..4).map(|i| water(250.0, i * 10, now)).collect();
        assert!((hydration_shift(&few) - 0.006).abs() < 1e-12);

        let many: Vec<_> = (0..30).map(|i| water(250.0, i, now)).collect();
        assert_eq!(hydration_shift(&many), MAX_HYDRATION_SHIFT);
    }
}
