//! BAC time series for charting.
//!
//! Real mode replays the drink log; when there is not enough of it, a short
//! synthetic backfill is generated so the chart has something to draw.
//! Synthetic points are flagged and are not a physiological replay.

use crate::bac::{estimate_bac, hours_between, MAX_BAC};
use crate::load::AlcoholLoad;
use crate::{Session, TrendPoint};
use chrono::{DateTime, Duration, Utc};

/// Drinks needed before the real replay is used
pub const MIN_REAL_POINTS: usize = 2;

pub const SYNTHETIC_POINTS: i64 = 8;
pub const SYNTHETIC_STEP_MINUTES: i64 = 15;
const SYNTHETIC_DECAY_PER_MINUTE: f64 = 0.002;

impl TrendPoint {
    /// Chart y-coordinate in [0, 1]
    pub fn normalized(&self) -> f64 {
        (self.bac / MAX_BAC).clamp(0.0, 1.0)
    }
}

/// BAC at each drink's time, using the cumulative load up to that drink
pub fn real_trend(session: &Session) -> Vec<TrendPoint> {
    let mut drinks: Vec<_> = session.drinks.iter().collect();
    drinks.sort_by_key(|d| d.timestamp);

    let mut load = AlcoholLoad::default();
    drinks
        .into_iter()
        .map(|drink| {
            load.add(drink);
            let hours = hours_between(session.start, drink.timestamp);
            TrendPoint {
                timestamp: drink.timestamp,
                bac: estimate_bac(
                    load.total_alcohol_grams,
                    session.body_weight_kg,
                    session.body_water_ratio,
                    hours,
                ),
                total_drinks: load.total_servings,
                synthetic: false,
            }
        })
        .collect()
}

/// Eight points over the last 105 minutes decaying backward from `current_bac`
pub fn synthetic_trend(
    current_bac: f64,
    hydration_shift: f64,
    total_drinks: f64,
    now: DateTime<Utc>,
) -> Vec<TrendPoint> {
    (0..SYNTHETIC_POINTS)
        .rev()
        .map(|step| {
            let minutes_ago = step * SYNTHETIC_STEP_MINUTES;
            let bac = (current_bac
                - minutes_ago as f64 * SYNTHETIC_DECAY_PER_MINUTE
                - hydration_shift)
                .clamp(0.0, MAX_BAC);
            TrendPoint {
                timestamp: now - Duration::minutes(minutes_ago),
                bac,
                total_drinks,
                synthetic: true,
            }
        })
        .collect()
}

/// Real replay when there are enough drinks, otherwise synthetic backfill
pub fn synthesize_trend(
    session: &Session,
    current_bac: f64,
    hydration_shift: f64,
    now: DateTime<Utc>,
) -> Vec<TrendPoint> {
    if session.drinks.len() >= MIN_REAL_POINTS {
        real_trend(session)
    } else {
        let servings = AlcoholLoad::from_drinks(&session.drinks).total_servings;
        synthetic_trend(current_bac, hydration_shift, servings, now)
    }
}
