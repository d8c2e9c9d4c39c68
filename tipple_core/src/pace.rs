//! Drinking pace from the spacing of the most recent drinks.
//!
//! The 1.5 points-per-minute slope and the 10 point ceiling are tuned
//! constants; changing them changes every stored score's meaning.

use crate::PaceLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NEUTRAL_PACE_SCORE: f64 = 3.0;
pub const MAX_PACE_SCORE: f64 = 10.0;
const PACE_SLOPE_PER_MINUTE: f64 = 1.5;
const PACE_SAMPLE_SIZE: usize = 3;

/// Score plus its bucket, as shown to the user
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaceReading {
    pub score: f64,
    pub label: PaceLabel,
}

impl PaceReading {
    pub fn from_timestamps(timestamps: &[DateTime<Utc>]) -> Self {
        if timestamps.len() < 2 {
            return Self {
                score: NEUTRAL_PACE_SCORE,
                label: PaceLabel::NotEnoughData,
            };
        }
        let score = pace_score(timestamps);
        Self {
            score,
            label: PaceLabel::from_score(score),
        }
    }
}

impl PaceLabel {
    pub fn from_score(score: f64) -> Self {
        if score <= 3.0 {
            PaceLabel::Slow
        } else if score <= 6.0 {
            PaceLabel::Normal
        } else {
            PaceLabel::Fast
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            PaceLabel::NotEnoughData => "Not enough data",
            PaceLabel::Slow => "slow",
            PaceLabel::Normal => "normal",
            PaceLabel::Fast => "fast",
        }
    }
}

impl std::fmt::Display for PaceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 0-10 velocity score; shorter gaps between drinks score higher
///
/// Fewer than two drinks score the neutral 3. Timestamps need not be sorted.
pub fn pace_score(timestamps: &[DateTime<Utc>]) -> f64 {
    if timestamps.len() < 2 {
        return NEUTRAL_PACE_SCORE;
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort();
    let recent = &sorted[sorted.len().saturating_sub(PACE_SAMPLE_SIZE)..];

    let intervals: Vec<f64> = recent
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_milliseconds() as f64 / 60_000.0)
        .collect();
    let avg_minutes = intervals.iter().sum::<f64>() / intervals.len() as f64;

    round1(MAX_PACE_SCORE - avg_minutes * PACE_SLOPE_PER_MINUTE).clamp(0.0, MAX_PACE_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(minutes: &[i64]) -> Vec<DateTime<Utc>> {
        let t0 = DateTime::parse_from_rfc3339("2025-06-14T21:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        minutes.iter().map(|m| t0 + Duration::minutes(*m)).collect()
    }

    #[test]
    fn test_not_enough_data() {
        assert_eq!(pace_score(&[]), 3.0);
        assert_eq!(pace_score(&at(&[0])), 3.0);
        let reading = PaceReading::from_timestamps(&at(&[0]));
        assert_eq!(reading.label, PaceLabel::NotEnoughData);
        assert_eq!(reading.label.to_string(), "Not enough data");
    }

    #[test]
    fn test_three_drinks_normal_pace() {
        let reading = PaceReading::from_timestamps(&at(&[0, 5, 8]));
        assert_eq!(reading.score, 4.0);
        assert_eq!(reading.label, PaceLabel::Normal);
    }

    #[test]
    fn test_only_last_three_count() {
        // The long gap before the last three drinks is ignored
        let score = pace_score(&at(&[0, 120, 121, 122]));
        assert_eq!(score, 8.5);
        assert_eq!(PaceLabel::from_score(score), PaceLabel::Fast);
    }

    #[test]
    fn test_unsorted_input() {
        assert_eq!(pace_score(&at(&[8, 0, 5])), 4.0);
    }

    #[test]
    fn test_slow_pace_clamps_to_zero() {
        let score = pace_score(&at(&[0, 45]));
        assert_eq!(score, 0.0);
        assert_eq!(PaceLabel::from_score(score), PaceLabel::Slow);
    }

    #[test]
    fn test_simultaneous_drinks_max_out() {
        assert_eq!(pace_score(&at(&[10, 10, 10])), 10.0);
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(PaceLabel::from_score(3.0), PaceLabel::Slow);
        assert_eq!(PaceLabel::from_score(3.1), PaceLabel::Normal);
        assert_eq!(PaceLabel::from_score(6.0), PaceLabel::Normal);
        assert_eq!(PaceLabel::from_score(6.1), PaceLabel::Fast);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        // Intervals of 1m20s average to 1.333.. minutes
        let t0 = at(&[0])[0];
        let stamps = vec![t0, t0 + Duration::seconds(80), t0 + Duration::seconds(160)];
        assert_eq!(pace_score(&stamps), 8.0);
    }
}
