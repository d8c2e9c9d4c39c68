//! Default catalog of beverages, containers, water servings and snacks.
//!
//! The engine never hardcodes these values; it reads them from whichever
//! `Catalog` the caller injects, so deployments can ship their own tables.

use crate::bac::{MAX_BODY_WATER_RATIO, MIN_BODY_WATER_RATIO};
use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog
///
/// **Note**: prefer `get_default_catalog()`, which returns a cached
/// reference. This is kept for tests and for building a custom catalog on
/// top of the defaults.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn beverage(id: &str, name: &str, abv: f64, container: &str) -> (String, Beverage) {
    (
        id.into(),
        Beverage {
            id: id.into(),
            name: name.into(),
            default_abv_percent: abv,
            default_container_id: container.into(),
        },
    )
}

fn container(id: &str, name: &str, volume_ml: f64) -> (String, Container) {
    (
        id.into(),
        Container {
            id: id.into(),
            name: name.into(),
            volume_ml,
        },
    )
}

fn water(id: &str, name: &str, volume_ml: f64) -> (String, WaterServing) {
    (
        id.into(),
        WaterServing {
            id: id.into(),
            name: name.into(),
            volume_ml,
        },
    )
}

fn snack(id: &str, name: &str, modifier: f64) -> (String, SnackOption) {
    (
        id.into(),
        SnackOption {
            id: id.into(),
            name: name.into(),
            absorption_modifier: modifier,
        },
    )
}

fn level(level: u8, min: f64, max: f64, label: &str, message: &str) -> CharacterLevel {
    CharacterLevel {
        level,
        min_percent: min,
        max_percent: max,
        label: label.into(),
        message: message.into(),
    }
}

fn build_default_catalog_internal() -> Catalog {
    // ========================================================================
    // Beverages
    // ========================================================================
    let beverages = HashMap::from([
        beverage("beer", "Beer (lager/ale)", 4.5, "can_330"),
        beverage("soju", "Soju", 16.0, "soju_shot"),
        beverage("wine", "Wine", 12.0, "wine_glass"),
        beverage("whiskey", "Whiskey", 40.0, "whiskey_shot"),
        beverage("vodka", "Vodka", 40.0, "vodka_shot"),
        beverage("rum", "Rum", 37.0, "rum_shot"),
        beverage("gin", "Gin", 40.0, "gin_shot"),
        beverage("tequila", "Tequila", 38.0, "tequila_shot"),
        beverage("cocktail", "Cocktail", 12.0, "cocktail_glass"),
    ]);

    // ========================================================================
    // Containers
    // ========================================================================
    let containers = HashMap::from([
        container("can_330", "Small can/bottle (330 ml)", 330.0),
        container("pint_500", "Large glass/pint (500 ml)", 500.0),
        container("soju_shot", "Soju shot (60 ml)", 60.0),
        container("wine_glass", "Wine glass (150 ml)", 150.0),
        container("whiskey_shot", "Whiskey pour (40 ml)", 40.0),
        container("vodka_shot", "Vodka shot (50 ml)", 50.0),
        container("rum_shot", "Rum shot (45 ml)", 45.0),
        container("gin_shot", "Gin shot (50 ml)", 50.0),
        container("tequila_shot", "Tequila shot (45 ml)", 45.0),
        container("cocktail_glass", "Cocktail (150 ml)", 150.0),
        container("margarita", "Margarita (150 ml)", 150.0),
        container("old_fashioned", "Old fashioned (90 ml)", 90.0),
        container("mojito", "Mojito (200 ml)", 200.0),
    ]);

    // ========================================================================
    // Water, snacks, body water
    // ========================================================================
    let water_servings = HashMap::from([
        water("glass", "Glass of water (250 ml)", 250.0),
        water("bottle", "Bottle of water (500 ml)", 500.0),
        water("cup", "Cup of water (200 ml)", 200.0),
    ]);

    let snacks = HashMap::from([
        snack("light", "Light snack", 0.95),
        snack("carb_heavy", "Carb-heavy snack", 0.90),
        snack("full_meal", "Full meal", 0.85),
    ]);

    let body_water_ratios = HashMap::from([
        (Sex::Male, 0.68),
        (Sex::Female, 0.55),
        (Sex::Other, 0.615),
    ]);

    // ========================================================================
    // Character levels
    // ========================================================================
    let character_levels = vec![
        level(0, 0.0, 5.0, "Clear-headed", "You haven't had a drink yet."),
        level(1, 5.0, 15.0, "Light buzz", "You feel relaxed and chatty."),
        level(2, 15.0, 25.0, "Happy vibes", "Great mood for conversations."),
        level(3, 25.0, 35.0, "Tipsy", "You're starting to feel it."),
        level(4, 35.0, 45.0, "Pretty buzzed", "Grab some water and slow down a bit."),
        level(5, 45.0, 55.0, "Heavily buzzed", "Time to pace yourself."),
        level(6, 55.0, 65.0, "High risk", "Adding more drinks is not a good idea."),
        level(7, 65.0, 75.0, "Danger zone", "Switch to water or snacks now."),
        level(8, 75.0, 90.0, "Very risky", "You might need support from a friend."),
        level(9, 90.0, 100.0, "Critical", "Stop drinking immediately."),
    ];

    Catalog {
        beverages,
        containers,
        water_servings,
        snacks,
        body_water_ratios,
        character_levels,
    }
}

impl Catalog {
    fn unknown(table: &'static str, id: &str) -> Error {
        Error::UnknownCatalogEntry {
            table,
            id: id.to_string(),
        }
    }

    /// Body-water ratio for a sex, falling back to the male default
    pub fn body_water_ratio(&self, sex: Sex) -> f64 {
        self.body_water_ratios
            .get(&sex)
            .or_else(|| self.body_water_ratios.get(&Sex::Male))
            .copied()
            .unwrap_or(0.68)
    }

    /// Turn a catalog drink order into a drink event
    pub fn resolve_drink(&self, order: &DrinkOrder) -> Result<DrinkEvent> {
        let beverage = self
            .beverages
            .get(&order.beverage_id)
            .ok_or_else(|| Self::unknown("beverage", &order.beverage_id))?;
        let container_id = order
            .container_id
            .as_deref()
            .unwrap_or(&beverage.default_container_id);
        let container = self
            .containers
            .get(container_id)
            .ok_or_else(|| Self::unknown("container", container_id))?;
        let abv = order.abv_percent.unwrap_or(beverage.default_abv_percent);

        DrinkEvent::new(
            &beverage.id,
            &container.id,
            order.quantity,
            container.volume_ml,
            abv,
            order.timestamp,
        )
    }

    pub fn resolve_water(&self, order: &WaterOrder) -> Result<HydrationEvent> {
        let serving = self
            .water_servings
            .get(&order.water_option_id)
            .ok_or_else(|| Self::unknown("water serving", &order.water_option_id))?;
        HydrationEvent::new(&serving.id, order.quantity, serving.volume_ml, order.timestamp)
    }

    pub fn resolve_snack(&self, order: &SnackOrder) -> Result<SnackEvent> {
        let option = self
            .snacks
            .get(&order.snack_option_id)
            .ok_or_else(|| Self::unknown("snack", &order.snack_option_id))?;
        SnackEvent::new(
            &option.id,
            order.quantity,
            option.absorption_modifier,
            order.timestamp,
        )
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, bev) in &self.beverages {
            if id.is_empty() || id != &bev.id {
                errors.push(format!("Beverage key '{}' doesn't match id '{}'", id, bev.id));
            }
            if !(0.0..=100.0).contains(&bev.default_abv_percent) {
                errors.push(format!(
                    "Beverage '{}': default ABV {} outside 0-100",
                    id, bev.default_abv_percent
                ));
            }
            if !self.containers.contains_key(&bev.default_container_id) {
                errors.push(format!(
                    "Beverage '{}' references non-existent container '{}'",
                    id, bev.default_container_id
                ));
            }
        }

        for (id, c) in &self.containers {
            if id.is_empty() || id != &c.id {
                errors.push(format!("Container key '{}' doesn't match id '{}'", id, c.id));
            }
            if c.volume_ml <= 0.0 {
                errors.push(format!("Container '{}' has non-positive volume", id));
            }
        }

        for (id, w) in &self.water_servings {
            if id.is_empty() || id != &w.id {
                errors.push(format!("Water serving key '{}' doesn't match id '{}'", id, w.id));
            }
            if w.volume_ml <= 0.0 {
                errors.push(format!("Water serving '{}' has non-positive volume", id));
            }
        }

        for (id, s) in &self.snacks {
            if id.is_empty() || id != &s.id {
                errors.push(format!("Snack key '{}' doesn't match id '{}'", id, s.id));
            }
            if s.absorption_modifier <= 0.0 || s.absorption_modifier > 1.0 {
                errors.push(format!(
                    "Snack '{}': modifier {} outside (0, 1]",
                    id, s.absorption_modifier
                ));
            }
        }

        for (sex, ratio) in &self.body_water_ratios {
            if !(MIN_BODY_WATER_RATIO..=MAX_BODY_WATER_RATIO).contains(ratio) {
                errors.push(format!("Body-water ratio for {} is out of range: {}", sex, ratio));
            }
        }

        errors.extend(validate_character_levels(&self.character_levels));

        if !errors.is_empty() {
            tracing::warn!("Catalog has {} validation errors", errors.len());
        }
        errors
    }
}

/// Levels must tile [0, 100] without gaps or overlaps
fn validate_character_levels(levels: &[CharacterLevel]) -> Vec<String> {
    let mut errors = Vec::new();

    let (Some(first), Some(last)) = (levels.first(), levels.last()) else {
        errors.push("Catalog has no character levels".to_string());
        return errors;
    };

    if first.min_percent != 0.0 {
        errors.push(format!("First character level starts at {}", first.min_percent));
    }
    if last.max_percent != 100.0 {
        errors.push(format!("Last character level ends at {}", last.max_percent));
    }

    for level in levels {
        if level.min_percent >= level.max_percent {
            errors.push(format!("Character level {} has an empty range", level.level));
        }
    }

    for pair in levels.windows(2) {
        if pair[0].max_percent != pair[1].min_percent {
            errors.push(format!(
                "Character levels {} and {} are not contiguous ({} vs {})",
                pair[0].level, pair[1].level, pair[0].max_percent, pair[1].min_percent
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.beverages.len(), 9);
        assert_eq!(catalog.containers.len(), 13);
        assert_eq!(catalog.snacks.len(), 3);
        assert_eq!(catalog.character_levels.len(), 10);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_detects_bad_entries() {
        let mut catalog = build_default_catalog();
        catalog.snacks.get_mut("light").unwrap().absorption_modifier = 1.2;
        catalog.containers.remove("can_330");
        catalog.body_water_ratios.insert(Sex::Other, 0.95);

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("Snack 'light'")));
        assert!(errors.iter().any(|e| e.contains("non-existent container 'can_330'")));
        assert!(errors.iter().any(|e| e.contains("other")));
    }

    #[test]
    fn test_detects_character_level_gap() {
        let mut catalog = build_default_catalog();
        catalog.character_levels[3].min_percent = 26.0;

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("not contiguous")));
    }

    #[test]
    fn test_resolve_drink_defaults() {
        let catalog = get_default_catalog();
        let drink = catalog
            .resolve_drink(&DrinkOrder {
                beverage_id: "beer".into(),
                container_id: None,
                quantity: 2.0,
                abv_percent: None,
                timestamp: Utc::now(),
            })
            .unwrap();

        assert_eq!(drink.container_id, "can_330");
        assert!((drink.volume_ml - 660.0).abs() < 1e-9);
        assert_eq!(drink.abv_percent, 4.5);
    }

    #[test]
    fn test_resolve_drink_overrides() {
        let catalog = get_default_catalog();
        let drink = catalog
            .resolve_drink(&DrinkOrder {
                beverage_id: "cocktail".into(),
                container_id: Some("mojito".into()),
                quantity: 1.0,
                abv_percent: Some(8.0),
                timestamp: Utc::now(),
            })
            .unwrap();

        assert!((drink.volume_ml - 200.0).abs() < 1e-9);
        assert_eq!(drink.abv_percent, 8.0);
    }

    #[test]
    fn test_resolve_unknown_entries() {
        let catalog = get_default_catalog();
        let err = catalog
            .resolve_drink(&DrinkOrder {
                beverage_id: "mead".into(),
                container_id: None,
                quantity: 1.0,
                abv_percent: None,
                timestamp: Utc::now(),
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCatalogEntry { table: "beverage", .. }));

        let err = catalog
            .resolve_snack(&SnackOrder {
                snack_option_id: "pretzels".into(),
                quantity: 1.0,
                timestamp: Utc::now(),
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCatalogEntry { table: "snack", .. }));
    }

    #[test]
    fn test_resolve_water_and_snack() {
        let catalog = get_default_catalog();
        let water = catalog
            .resolve_water(&WaterOrder {
                water_option_id: "bottle".into(),
                quantity: 1.5,
                timestamp: Utc::now(),
            })
            .unwrap();
        assert!((water.volume_ml - 750.0).abs() < 1e-9);

        let snack = catalog
            .resolve_snack(&SnackOrder {
                snack_option_id: "full_meal".into(),
                quantity: 1.0,
                timestamp: Utc::now(),
            })
            .unwrap();
        assert_eq!(snack.absorption_modifier, 0.85);
    }

    #[test]
    fn test_body_water_ratio_by_sex() {
        let catalog = get_default_catalog();
        assert_eq!(catalog.body_water_ratio(Sex::Male), 0.68);
        assert_eq!(catalog.body_water_ratio(Sex::Female), 0.55);

        let mut custom = build_default_catalog();
        custom.body_water_ratios.remove(&Sex::Other);
        assert_eq!(custom.body_water_ratio(Sex::Other), 0.68);
    }
}
