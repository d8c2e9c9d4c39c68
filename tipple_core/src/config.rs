//! Configuration file support for Tipple.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/tipple/config.toml`.

use crate::bac::clamp_body_water_ratio;
use crate::session::DEFAULT_BACKDATE_MINUTES;
use crate::{Catalog, Error, Result, Sex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Body profile used when starting a session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_weight_kg")]
    pub weight_kg: f64,

    #[serde(default)]
    pub sex: Sex,

    /// Explicit ratio; when absent the catalog value for `sex` is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_water_ratio: Option<f64>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            weight_kg: default_weight_kg(),
            sex: Sex::default(),
            body_water_ratio: None,
        }
    }
}

impl ProfileConfig {
    /// Resolve the ratio for this profile, clamped into range
    pub fn body_water_ratio_for(&self, catalog: &Catalog) -> f64 {
        clamp_body_water_ratio(
            self.body_water_ratio
                .unwrap_or_else(|| catalog.body_water_ratio(self.sex)),
        )
    }
}

/// Estimation model switches
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Subtract a capped per-glass hydration offset directly from BAC.
    /// Off by default: hydration then only stretches or shortens rest time.
    #[serde(default)]
    pub direct_bac_offset_enabled: bool,

    /// How far a new session's start is backdated, in minutes
    #[serde(default = "default_backdate_minutes")]
    pub backdate_minutes: i64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            direct_bac_offset_enabled: false,
            backdate_minutes: default_backdate_minutes(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("tipple")
}

fn default_weight_kg() -> f64 {
    70.0
}

fn default_backdate_minutes() -> i64 {
    DEFAULT_BACKDATE_MINUTES
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the engine would refuse anyway, with a config-level message
    pub fn validate(&self) -> Result<()> {
        if !self.profile.weight_kg.is_finite() || self.profile.weight_kg < 0.0 {
            return Err(Error::Config(format!(
                "profile.weight_kg must be non-negative, got {}",
                self.profile.weight_kg
            )));
        }
        if let Some(ratio) = self.profile.body_water_ratio {
            if !ratio.is_finite() {
                return Err(Error::Config("profile.body_water_ratio must be finite".into()));
            }
        }
        if self.model.backdate_minutes < 0 {
            return Err(Error::Config(format!(
                "model.backdate_minutes must be non-negative, got {}",
                self.model.backdate_minutes
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("tipple").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
