//! Event log: validated event construction and session mutation.
//!
//! Events are validated once, when they are created, and are immutable
//! afterwards. A session only ever grows or shrinks by whole events.

use crate::bac::clamp_body_water_ratio;
use crate::units::to_ethanol_grams;
use crate::{DrinkEvent, Error, HydrationEvent, RemovedEvent, Result, Session, SnackEvent};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// How far a new session's start is backdated when the caller does not say
pub const DEFAULT_BACKDATE_MINUTES: i64 = 15;

/// Largest absorption modifier accepted at the boundary
pub const MAX_SNACK_MODIFIER: f64 = 1.5;

fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Quantities are servings in half-serving steps
pub(crate) fn check_quantity(quantity: f64) -> Result<()> {
    let doubled = quantity * 2.0;
    if !quantity.is_finite() || quantity < 0.5 || (doubled - doubled.round()).abs() > 1e-9 {
        return Err(Error::invalid(format!(
            "quantity must be a positive multiple of 0.5, got {quantity}"
        )));
    }
    Ok(())
}

pub(crate) fn check_abv(abv_percent: f64) -> Result<()> {
    if !abv_percent.is_finite() || !(0.0..=100.0).contains(&abv_percent) {
        return Err(Error::invalid(format!(
            "ABV must be between 0 and 100 percent, got {abv_percent}"
        )));
    }
    Ok(())
}

pub(crate) fn check_snack_modifier(modifier: f64) -> Result<()> {
    if !modifier.is_finite() || modifier <= 0.0 || modifier > MAX_SNACK_MODIFIER {
        return Err(Error::invalid(format!(
            "snack modifier must be in (0, {MAX_SNACK_MODIFIER}], got {modifier}"
        )));
    }
    Ok(())
}

impl DrinkEvent {
    /// Build a drink from a per-serving volume; total volume and alcohol
    /// grams are derived here and never change afterwards.
    pub fn new(
        beverage_id: impl Into<String>,
        container_id: impl Into<String>,
        quantity: f64,
        serving_volume_ml: f64,
        abv_percent: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        check_quantity(quantity)?;
        check_non_negative("volume_ml", serving_volume_ml)?;
        check_abv(abv_percent)?;

        let volume_ml = serving_volume_ml * quantity;
        Ok(Self {
            id: Uuid::new_v4(),
            beverage_id: beverage_id.into(),
            container_id: container_id.into(),
            quantity,
            volume_ml,
            abv_percent,
            alcohol_grams: to_ethanol_grams(volume_ml, abv_percent),
            timestamp,
        })
    }
}

impl HydrationEvent {
    pub fn new(
        water_option_id: impl Into<String>,
        quantity: f64,
        serving_volume_ml: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        check_quantity(quantity)?;
        check_non_negative("volume_ml", serving_volume_ml)?;

        Ok(Self {
            id: Uuid::new_v4(),
            water_option_id: water_option_id.into(),
            quantity,
            volume_ml: serving_volume_ml * quantity,
            timestamp,
        })
    }
}

impl SnackEvent {
    pub fn new(
        snack_option_id: impl Into<String>,
        quantity: f64,
        absorption_modifier: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        check_quantity(quantity)?;
        check_snack_modifier(absorption_modifier)?;

        Ok(Self {
            id: Uuid::new_v4(),
            snack_option_id: snack_option_id.into(),
            quantity,
            absorption_modifier,
            timestamp,
        })
    }
}

impl Session {
    /// Start a session at an explicit time
    ///
    /// The body-water ratio is clamped into range; a negative or non-finite
    /// weight, or a non-finite ratio, is rejected.
    pub fn new(body_weight_kg: f64, body_water_ratio: f64, start: DateTime<Utc>) -> Result<Self> {
        check_non_negative("body_weight_kg", body_weight_kg)?;
        if !body_water_ratio.is_finite() {
            return Err(Error::invalid(format!(
                "body_water_ratio must be a finite number, got {body_water_ratio}"
            )));
        }

        let session = Self {
            id: Uuid::new_v4(),
            start,
            body_weight_kg,
            body_water_ratio: clamp_body_water_ratio(body_water_ratio),
            drinks: Vec::new(),
            hydration: Vec::new(),
            snacks: Vec::new(),
        };
        tracing::info!(
            "Started session {} at {} ({} kg, ratio {:.3})",
            session.id,
            session.start,
            session.body_weight_kg,
            session.body_water_ratio
        );
        Ok(session)
    }

    /// Start a session whose clock began `backdate_minutes` before `now`
    pub fn start_backdated(
        body_weight_kg: f64,
        body_water_ratio: f64,
        now: DateTime<Utc>,
        backdate_minutes: i64,
    ) -> Result<Self> {
        if backdate_minutes < 0 {
            return Err(Error::invalid(format!(
                "backdate must be non-negative, got {backdate_minutes}"
            )));
        }
        Self::new(
            body_weight_kg,
            body_water_ratio,
            now - Duration::minutes(backdate_minutes),
        )
    }

    fn contains_id(&self, id: Uuid) -> bool {
        self.drinks.iter().any(|e| e.id == id)
            || self.hydration.iter().any(|e| e.id == id)
            || self.snacks.iter().any(|e| e.id == id)
    }

    fn ensure_unique(&self, id: Uuid) -> Result<()> {
        if self.contains_id(id) {
            return Err(Error::invalid(format!(
                "event {id} is already logged in session {}",
                self.id
            )));
        }
        Ok(())
    }

    pub fn add_drink(&mut self, drink: DrinkEvent) -> Result<Uuid> {
        self.ensure_unique(drink.id)?;
        tracing::debug!(
            "Logged drink {} ({} ml @ {}%, {:.2} g)",
            drink.id,
            drink.volume_ml,
            drink.abv_percent,
            drink.alcohol_grams
        );
        let id = drink.id;
        self.drinks.push(drink);
        Ok(id)
    }

    pub fn add_hydration(&mut self, water: HydrationEvent) -> Result<Uuid> {
        self.ensure_unique(water.id)?;
        tracing::debug!("Logged hydration {} ({} ml)", water.id, water.volume_ml);
        let id = water.id;
        self.hydration.push(water);
        Ok(id)
    }

    pub fn add_snack(&mut self, snack: SnackEvent) -> Result<Uuid> {
        self.ensure_unique(snack.id)?;
        tracing::debug!(
            "Logged snack {} ({}, modifier {})",
            snack.id,
            snack.snack_option_id,
            snack.absorption_modifier
        );
        let id = snack.id;
        self.snacks.push(snack);
        Ok(id)
    }

    pub fn remove_drink(&mut self, id: Uuid) -> Option<DrinkEvent> {
        let idx = self.drinks.iter().position(|e| e.id == id)?;
        Some(self.drinks.remove(idx))
    }

    pub fn remove_hydration(&mut self, id: Uuid) -> Option<HydrationEvent> {
        let idx = self.hydration.iter().position(|e| e.id == id)?;
        Some(self.hydration.remove(idx))
    }

    pub fn remove_snack(&mut self, id: Uuid) -> Option<SnackEvent> {
        let idx = self.snacks.iter().position(|e| e.id == id)?;
        Some(self.snacks.remove(idx))
    }

    /// Remove an event of any kind by id
    pub fn remove_event(&mut self, id: Uuid) -> Option<RemovedEvent> {
        let removed = self
            .remove_drink(id)
            .map(RemovedEvent::Drink)
            .or_else(|| self.remove_hydration(id).map(RemovedEvent::Hydration))
            .or_else(|| self.remove_snack(id).map(RemovedEvent::Snack));

        match &removed {
            Some(_) => tracing::debug!("Removed event {} from session {}", id, self.id),
            None => tracing::debug!("No event {} in session {}", id, self.id),
        }
        removed
    }

    /// Clear every event list and restart the clock
    pub fn reset(&mut self, start: DateTime<Utc>) {
        tracing::info!(
            "Resetting session {} ({} drinks, {} waters, {} snacks dropped)",
            self.id,
            self.drinks.len(),
            self.hydration.len(),
            self.snacks.len()
        );
        self.drinks.clear();
        self.hydration.clear();
        self.snacks.clear();
        self.start = start;
    }

    /// The drink with the greatest timestamp; later-logged wins a tie
    pub fn latest_drink(&self) -> Option<&DrinkEvent> {
        self.drinks
            .iter()
            .enumerate()
            .max_by_key(|(idx, d)| (d.timestamp, *idx))
            .map(|(_, d)| d)
    }

    pub fn drink_timestamps(&self) -> Vec<DateTime<Utc>> {
        self.drinks.iter().map(|d| d.timestamp).collect()
    }

    pub fn event_count(&self) -> usize {
        self.drinks.len() + self.hydration.len() + self.snacks.len()
    }
}
