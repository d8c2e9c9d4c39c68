//! Snapshot engine: composes every scorer into one `BacSnapshot`.
//!
//! Evaluation order:
//!
//! 1. Fold drinks into the alcohol load and estimate BAC at `now`
//! 2. Optionally subtract the capped hydration offset (compatibility policy)
//! 3. Score hydration, snack buffer and pace
//! 4. Classify risk and character level, then derive rest guidance
//!
//! Nothing here reads the clock or mutates the session; calling `evaluate`
//! twice with the same inputs yields the same snapshot.

use crate::bac::{estimate_bac, hours_between, intoxication_percent, MAX_BAC};
use crate::config::ModelConfig;
use crate::hydration::{hydration_modifier, hydration_score, hydration_shift};
use crate::load::AlcoholLoad;
use crate::pace::PaceReading;
use crate::rest::RestRecommendation;
use crate::risk::character_level;
use crate::snack::snack_modifier;
use crate::trend::synthesize_trend;
use crate::{BacSnapshot, Catalog, RiskLevel, Session, TrendPoint};
use chrono::{DateTime, Utc};

/// Widmark BAC at `now`, before any hydration offset
fn widmark_bac(session: &Session, now: DateTime<Utc>) -> f64 {
    let load = AlcoholLoad::from_drinks(&session.drinks);
    estimate_bac(
        load.total_alcohol_grams,
        session.body_weight_kg,
        session.body_water_ratio,
        hours_between(session.start, now),
    )
}

/// Offset subtracted from BAC under the configured hydration policy
fn policy_shift(session: &Session, model: &ModelConfig) -> f64 {
    if model.direct_bac_offset_enabled {
        hydration_shift(&session.hydration)
    } else {
        0.0
    }
}

/// BAC at `now` under the configured hydration policy
pub fn current_bac(session: &Session, model: &ModelConfig, now: DateTime<Utc>) -> f64 {
    (widmark_bac(session, now) - policy_shift(session, model)).clamp(0.0, MAX_BAC)
}

/// Project a session onto a snapshot at `now`
pub fn evaluate(
    session: &Session,
    catalog: &Catalog,
    model: &ModelConfig,
    now: DateTime<Utc>,
) -> BacSnapshot {
    let load = AlcoholLoad::from_drinks(&session.drinks);
    let hours_since_start = hours_between(session.start, now);
    let bac = current_bac(session, model, now);
    let percent = intoxication_percent(bac);

    let hydration = hydration_score(&session.hydration, now);
    let hydration_mod = hydration_modifier(hydration);
    let snack_mod = snack_modifier(&session.snacks, now);
    let pace = PaceReading::from_timestamps(&session.drink_timestamps());

    let risk = RiskLevel::classify(bac);
    let rest = RestRecommendation::compute(session, bac, hydration_mod, snack_mod);

    tracing::debug!(
        "Evaluated session {}: bac={:.4} risk={} pace={} rest={}m",
        session.id,
        bac,
        risk,
        pace.score,
        rest.rest_minutes
    );

    BacSnapshot {
        evaluated_at: now,
        bac,
        intoxication_percent: percent,
        risk_level: risk,
        recommended_action: risk.recommended_action().to_string(),
        character_level: character_level(percent, &catalog.character_levels).cloned(),
        pace_score: pace.score,
        pace_label: pace.label,
        hours_since_start,
        hydration_score: hydration,
        hydration_modifier: hydration_mod,
        snack_modifier: snack_mod,
        rest_minutes: rest.rest_minutes,
        baseline_rest_minutes: rest.baseline_rest_minutes,
        minutes_to_target: rest.minutes_to_target,
        minutes_for_latest_drink: rest.minutes_for_latest_drink,
        total_alcohol_grams: load.total_alcohol_grams,
        total_volume_ml: load.total_volume_ml,
        total_servings: load.total_servings,
    }
}

/// Chart series for a session at `now`, honouring the hydration policy
///
/// The synthetic backfill subtracts the offset itself, so it starts from
/// the raw Widmark value; its newest point equals `current_bac`.
pub fn trend_points(session: &Session, model: &ModelConfig, now: DateTime<Utc>) -> Vec<TrendPoint> {
    synthesize_trend(
        session,
        widmark_bac(session, now),
        policy_shift(session, model),
        now,
    )
}
