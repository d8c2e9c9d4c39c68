//! Cumulative alcohol load over a session's drinks.

use crate::DrinkEvent;
use serde::{Deserialize, Serialize};

/// Totals folded from drink events. Order of events does not matter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlcoholLoad {
    pub total_alcohol_grams: f64,
    pub total_volume_ml: f64,
    pub total_servings: f64,
}

impl AlcoholLoad {
    pub fn from_drinks(drinks: &[DrinkEvent]) -> Self {
        drinks.iter().fold(Self::default(), |mut acc, drink| {
            acc.add(drink);
            acc
        })
    }

    pub fn add(&mut self, drink: &DrinkEvent) {
        self.total_alcohol_grams += drink.alcohol_grams.max(0.0);
        self.total_volume_ml += drink.volume_ml.max(0.0);
        self.total_servings += drink.quantity.max(0.0);
    }
}
