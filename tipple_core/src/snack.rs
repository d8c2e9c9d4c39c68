//! Snack buffering: only the most recent snack can be active.

use crate::bac::minutes_between;
use crate::SnackEvent;
use chrono::{DateTime, Utc};

/// How long a snack keeps slowing absorption
pub const SNACK_EFFECT_WINDOW_MINUTES: f64 = 90.0;

/// Most recent snack by timestamp; a later-logged snack wins a tie
pub fn latest_snack(events: &[SnackEvent]) -> Option<&SnackEvent> {
    events
        .iter()
        .enumerate()
        .max_by_key(|(idx, s)| (s.timestamp, *idx))
        .map(|(_, s)| s)
}

/// Absorption modifier of the latest snack while it is inside the window,
/// otherwise 1.0. Earlier snacks are superseded, never stacked.
pub fn snack_modifier(events: &[SnackEvent], now: DateTime<Utc>) -> f64 {
    match latest_snack(events) {
        Some(snack) if minutes_between(snack.timestamp, now) <= SNACK_EFFECT_WINDOW_MINUTES => {
            snack.absorption_modifier
        }
        _ => 1.0,
    }
}
