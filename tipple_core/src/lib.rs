#![forbid(unsafe_code)]

//! Core domain model and estimation engine for Tipple.
//!
//! This crate provides:
//! - Domain types (drink, hydration and snack events; the session aggregate)
//! - Catalog tables (beverages, containers, water, snacks, character levels)
//! - The BAC engine (alcohol load, elimination, hydration, snacks, pace,
//!   risk, rest time, trend)
//! - Boundary input parsing
//! - A file-backed session store and CSV trend export for the CLI

pub mod types;
pub mod error;
pub mod units;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod session;
pub mod input;
pub mod load;
pub mod bac;
pub mod hydration;
pub mod snack;
pub mod pace;
pub mod risk;
pub mod rest;
pub mod trend;
pub mod engine;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::{Config, ModelConfig, ProfileConfig};
pub use units::{convert_volume, to_ethanol_grams, VolumeUnit};
pub use input::{parse_timestamp, InputEvent};
pub use load::AlcoholLoad;
pub use bac::{estimate_bac, intoxication_percent};
pub use pace::{pace_score, PaceReading};
pub use rest::RestRecommendation;
pub use engine::{evaluate, trend_points};
pub use store::{JsonFileStore, SessionStore};
