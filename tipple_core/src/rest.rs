//! Rest-time guidance derived from current BAC.

use crate::bac::{bac_impact, ELIMINATION_RATE_PER_HOUR, MAX_BAC};
use crate::{DrinkEvent, Session};
use serde::{Deserialize, Serialize};

/// Share of current BAC the baseline rest aims to shed
pub const REST_REDUCTION_SHARE: f64 = 0.30;

/// BAC the "minutes to target" countdown aims for
pub const TARGET_BAC: f64 = 0.05;

/// Rest guidance bundle carried into the snapshot
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestRecommendation {
    pub baseline_rest_minutes: u32,
    pub rest_minutes: u32,
    pub minutes_to_target: u32,
    pub minutes_for_latest_drink: Option<u32>,
}

/// Minutes of elimination needed to remove `bac_drop` percentage points
fn elimination_minutes(bac_drop: f64) -> u32 {
    if bac_drop <= 0.0 {
        return 0;
    }
    ((bac_drop / ELIMINATION_RATE_PER_HOUR) * 60.0).ceil() as u32
}

/// Minutes to shed 30% of `bac` through elimination alone
pub fn baseline_rest_minutes(bac: f64) -> u32 {
    elimination_minutes(bac * REST_REDUCTION_SHARE)
}

/// Baseline scaled by hydration and snack modifiers, never below one minute
pub fn adjusted_rest_minutes(baseline: u32, hydration_modifier: f64, snack_modifier: f64) -> u32 {
    let adjusted = (baseline as f64 * hydration_modifier * snack_modifier).round();
    adjusted.max(1.0) as u32
}

/// Minutes until BAC falls to the target, zero when already at or below it
pub fn minutes_to_target(bac: f64) -> u32 {
    if bac > TARGET_BAC {
        elimination_minutes(bac - TARGET_BAC)
    } else {
        0
    }
}

/// How long one drink's own contribution takes to clear, ignoring the rest
/// of the session's load
pub fn minutes_for_drink(drink: &DrinkEvent, body_weight_kg: f64, body_water_ratio: f64) -> u32 {
    let impact = bac_impact(drink.alcohol_grams, body_weight_kg, body_water_ratio).min(MAX_BAC);
    elimination_minutes(impact)
}

impl RestRecommendation {
    pub fn compute(
        session: &Session,
        bac: f64,
        hydration_modifier: f64,
        snack_modifier: f64,
    ) -> Self {
        let baseline = baseline_rest_minutes(bac);
        Self {
            baseline_rest_minutes: baseline,
            rest_minutes: adjusted_rest_minutes(baseline, hydration_modifier, snack_modifier),
            minutes_to_target: minutes_to_target(bac),
            minutes_for_latest_drink: session.latest_drink().map(|drink| {
                minutes_for_drink(drink, session.body_weight_kg, session.body_water_ratio)
            }),
        }
    }
}
