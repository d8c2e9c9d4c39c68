//! Boundary input shapes.
//!
//! Callers outside the engine (photo recognition, a remote session store, a
//! JSON batch file) hand events over in these shapes. Everything is checked
//! here; nothing invalid reaches a `Session`.

use crate::session::check_snack_modifier;
use crate::{DrinkEvent, Error, HydrationEvent, Result, Session, SnackEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Beverage id recorded for drinks that did not come from the catalog
pub const CUSTOM_BEVERAGE_ID: &str = "custom";
/// Container id recorded for drinks with a free-form volume
pub const CUSTOM_CONTAINER_ID: &str = "custom";
/// Water option id recorded for free-form hydration
pub const CUSTOM_WATER_ID: &str = "custom";

/// Parse an RFC 3339 / ISO-8601 timestamp
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidInput(format!("malformed timestamp '{raw}': {e}")))
}

fn default_quantity() -> f64 {
    1.0
}

/// `volume_ml` is the total volume drunk
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrinkInput {
    pub volume_ml: f64,
    pub abv_percent: f64,
    pub timestamp: String,
    #[serde(default)]
    pub beverage_id: Option<String>,
    #[serde(default)]
    pub container_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HydrationInput {
    pub volume_ml: f64,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnackInput {
    pub snack_type_id: String,
    pub modifier: f64,
    pub timestamp: String,
}

/// One event in a JSON batch, tagged by `kind`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Drink(DrinkInput),
    Hydration(HydrationInput),
    Snack(SnackInput),
}

impl TryFrom<&DrinkInput> for DrinkEvent {
    type Error = Error;

    fn try_from(input: &DrinkInput) -> Result<Self> {
        let timestamp = parse_timestamp(&input.timestamp)?;
        crate::session::check_quantity(input.quantity)?;
        if !input.volume_ml.is_finite() || input.volume_ml < 0.0 {
            return Err(Error::InvalidInput(format!(
                "volume_ml must be a non-negative number, got {}",
                input.volume_ml
            )));
        }
        DrinkEvent::new(
            input.beverage_id.as_deref().unwrap_or(CUSTOM_BEVERAGE_ID),
            input.container_id.as_deref().unwrap_or(CUSTOM_CONTAINER_ID),
            input.quantity,
            input.volume_ml / input.quantity,
            input.abv_percent,
            timestamp,
        )
    }
}

impl TryFrom<&HydrationInput> for HydrationEvent {
    type Error = Error;

    fn try_from(input: &HydrationInput) -> Result<Self> {
        let timestamp = parse_timestamp(&input.timestamp)?;
        HydrationEvent::new(CUSTOM_WATER_ID, 1.0, input.volume_ml, timestamp)
    }
}

impl TryFrom<&SnackInput> for SnackEvent {
    type Error = Error;

    fn try_from(input: &SnackInput) -> Result<Self> {
        let timestamp = parse_timestamp(&input.timestamp)?;
        if input.snack_type_id.trim().is_empty() {
            return Err(Error::InvalidInput("snack_type_id must not be empty".into()));
        }
        check_snack_modifier(input.modifier)?;
        SnackEvent::new(input.snack_type_id.trim(), 1.0, input.modifier, timestamp)
    }
}

impl Session {
    /// Validate and append one boundary event
    pub fn apply_input(&mut self, input: &InputEvent) -> Result<Uuid> {
        match input {
            InputEvent::Drink(d) => self.add_drink(DrinkEvent::try_from(d)?),
            InputEvent::Hydration(h) => self.add_hydration(HydrationEvent::try_from(h)?),
            InputEvent::Snack(s) => self.add_snack(SnackEvent::try_from(s)?),
        }
    }

    /// Apply a batch all-or-nothing: every input is validated before any is
    /// appended.
    pub fn apply_inputs(&mut self, inputs: &[InputEvent]) -> Result<Vec<Uuid>> {
        let mut staged = self.clone();
        let ids = inputs
            .iter()
            .enumerate()
            .map(|(idx, input)| {
                staged.apply_input(input).map_err(|e| match e {
                    Error::InvalidInput(msg) => {
                        Error::InvalidInput(format!("event #{}: {}", idx + 1, msg))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        *self = staged;
        tracing::info!("Applied {} events to session {}", ids.len(), self.id);
        Ok(ids)
    }
}
