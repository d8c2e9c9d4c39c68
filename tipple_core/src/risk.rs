//! Risk tiers over BAC and narrative character levels over intoxication percent.
//!
//! Both classifiers are stateless and reclassify from scratch on every call.

use crate::{CharacterLevel, RiskLevel};

/// Lower bound of the caution tier
pub const CAUTION_BAC: f64 = 0.03;
/// Lower bound of the danger tier
pub const DANGER_BAC: f64 = 0.08;

impl RiskLevel {
    /// safe = [0, 0.03), caution = [0.03, 0.08), danger = [0.08, ..]
    pub fn classify(bac: f64) -> Self {
        if bac < CAUTION_BAC {
            RiskLevel::Safe
        } else if bac < DANGER_BAC {
            RiskLevel::Caution
        } else {
            RiskLevel::Danger
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Caution => "caution",
            RiskLevel::Danger => "danger",
        }
    }

    pub const fn recommended_action(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "You are in a comfortable zone.",
            RiskLevel::Caution => "Hydrate & slow down a bit.",
            RiskLevel::Danger => "Pause drinking immediately and rest.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CharacterLevel {
    /// `[min, max)`, with the top tier also owning its upper bound
    pub fn contains(&self, percent: f64, is_top: bool) -> bool {
        percent >= self.min_percent
            && (percent < self.max_percent || (is_top && percent <= self.max_percent))
    }
}

/// Find the character level for an intoxication percent
///
/// `levels` must be sorted by `min_percent` (see `Catalog::validate`).
/// Percentages outside [0, 100] are clamped first.
pub fn character_level(percent: f64, levels: &[CharacterLevel]) -> Option<&CharacterLevel> {
    let percent = percent.clamp(0.0, 100.0);
    let last = levels.len().checked_sub(1)?;
    levels
        .iter()
        .enumerate()
        .find(|(idx, level)| level.contains(percent, *idx == last))
        .map(|(_, level)| level)
}
