//! Core domain types for the Tipple BAC estimator.
//!
//! This module defines the fundamental types used throughout the system:
//! - Logged events (drinks, hydration, snacks)
//! - The session aggregate that owns them
//! - Catalog reference tables
//! - Derived outputs (snapshot, trend points)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Profile Types
// ============================================================================

/// Sex used to look up a default body-water ratio
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
    Other,
}

impl Sex {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sex {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            "other" | "o" => Ok(Sex::Other),
            other => Err(crate::Error::InvalidInput(format!("unknown sex: {other}"))),
        }
    }
}

// ============================================================================
// Event Types
// ============================================================================

/// A logged drink. Derived fields are fixed at creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrinkEvent {
    pub id: Uuid,
    pub beverage_id: String,
    pub container_id: String,
    pub quantity: f64,
    pub volume_ml: f64,
    pub abv_percent: f64,
    pub alcohol_grams: f64,
    pub timestamp: DateTime<Utc>,
}

/// A logged glass (or several) of water
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HydrationEvent {
    pub id: Uuid,
    pub water_option_id: String,
    pub quantity: f64,
    pub volume_ml: f64,
    pub timestamp: DateTime<Utc>,
}

/// A logged snack with its absorption modifier resolved at log time
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SnackEvent {
    pub id: Uuid,
    pub snack_option_id: String,
    pub quantity: f64,
    pub absorption_modifier: f64,
    pub timestamp: DateTime<Utc>,
}

/// Any event removed from a session, returned so callers can report it
#[derive(Clone, Debug, PartialEq)]
pub enum RemovedEvent {
    Drink(DrinkEvent),
    Hydration(HydrationEvent),
    Snack(SnackEvent),
}

// ============================================================================
// Session Aggregate
// ============================================================================

/// One drinking session. The engine reads it, callers mutate it through
/// the add/remove/reset methods in `session.rs`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub body_weight_kg: f64,
    pub body_water_ratio: f64,
    #[serde(default)]
    pub drinks: Vec<DrinkEvent>,
    #[serde(default)]
    pub hydration: Vec<HydrationEvent>,
    #[serde(default)]
    pub snacks: Vec<SnackEvent>,
}

// ============================================================================
// Derived Outputs
// ============================================================================

/// Three-tier risk classification
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Safe,
    Caution,
    Danger,
}

/// Drinking pace bucket
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaceLabel {
    NotEnoughData,
    Slow,
    Normal,
    Fast,
}

/// Point-in-time view of a session. Never stored by the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BacSnapshot {
    pub evaluated_at: DateTime<Utc>,
    pub bac: f64,
    pub intoxication_percent: f64,
    pub risk_level: RiskLevel,
    pub recommended_action: String,
    pub character_level: Option<CharacterLevel>,
    pub pace_score: f64,
    pub pace_label: PaceLabel,
    pub hours_since_start: f64,
    pub hydration_score: f64,
    pub hydration_modifier: f64,
    pub snack_modifier: f64,
    pub rest_minutes: u32,
    pub baseline_rest_minutes: u32,
    pub minutes_to_target: u32,
    pub minutes_for_latest_drink: Option<u32>,
    pub total_alcohol_grams: f64,
    pub total_volume_ml: f64,
    pub total_servings: f64,
}

/// One charting sample
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub bac: f64,
    pub total_drinks: f64,
    pub synthetic: bool,
}

// ============================================================================
// Catalog Types
// ============================================================================

/// A beverage with its default strength and serving container
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Beverage {
    pub id: String,
    pub name: String,
    pub default_abv_percent: f64,
    pub default_container_id: String,
}

/// A serving container (can, shot glass, wine glass, ...)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub volume_ml: f64,
}

/// A water serving size
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaterServing {
    pub id: String,
    pub name: String,
    pub volume_ml: f64,
}

/// A snack option and how strongly it buffers absorption
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnackOption {
    pub id: String,
    pub name: String,
    pub absorption_modifier: f64,
}

/// One narrative tier over intoxication percent, `[min_percent, max_percent)`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CharacterLevel {
    pub level: u8,
    pub min_percent: f64,
    pub max_percent: f64,
    pub label: String,
    pub message: String,
}

/// A drink picked from the catalog, resolved by `Catalog::resolve_drink`
#[derive(Clone, Debug)]
pub struct DrinkOrder {
    pub beverage_id: String,
    /// Defaults to the beverage's own container
    pub container_id: Option<String>,
    pub quantity: f64,
    /// Overrides the beverage's default ABV
    pub abv_percent: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Water picked from the catalog
#[derive(Clone, Debug)]
pub struct WaterOrder {
    pub water_option_id: String,
    pub quantity: f64,
    pub timestamp: DateTime<Utc>,
}

/// A snack picked from the catalog
#[derive(Clone, Debug)]
pub struct SnackOrder {
    pub snack_option_id: String,
    pub quantity: f64,
    pub timestamp: DateTime<Utc>,
}

/// Reference tables injected into the engine
#[derive(Clone, Debug)]
pub struct Catalog {
    pub beverages: HashMap<String, Beverage>,
    pub containers: HashMap<String, Container>,
    pub water_servings: HashMap<String, WaterServing>,
    pub snacks: HashMap<String, SnackOption>,
    pub body_water_ratios: HashMap<Sex, f64>,
    /// Sorted by `min_percent`
    pub character_levels: Vec<CharacterLevel>,
}
