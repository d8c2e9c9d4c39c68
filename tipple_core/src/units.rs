//! Volume normalization and ethanol mass.

use serde::{Deserialize, Serialize};

/// Density of ethanol in g/ml
pub const ETHANOL_DENSITY_G_PER_ML: f64 = 0.789;

/// Milliliters in one US fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.57;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VolumeUnit {
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "fl-oz")]
    FluidOunce,
}

impl VolumeUnit {
    fn ml_per_unit(self) -> f64 {
        match self {
            VolumeUnit::Milliliter => 1.0,
            VolumeUnit::FluidOunce => ML_PER_FL_OZ,
        }
    }
}

impl std::str::FromStr for VolumeUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "ml" => Ok(VolumeUnit::Milliliter),
            "fl-oz" | "floz" | "oz" => Ok(VolumeUnit::FluidOunce),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown volume unit: {other}"
            ))),
        }
    }
}

/// Grams of ethanol in `volume_ml` of a drink at `abv_percent`
///
/// Negative inputs count as zero.
pub fn to_ethanol_grams(volume_ml: f64, abv_percent: f64) -> f64 {
    volume_ml.max(0.0) * (abv_percent.max(0.0) / 100.0) * ETHANOL_DENSITY_G_PER_ML
}

/// Convert a volume between units. Negative input clamps to zero.
pub fn convert_volume(value: f64, from: VolumeUnit, to: VolumeUnit) -> f64 {
    if from == to {
        return value.max(0.0);
    }
    value.max(0.0) * from.ml_per_unit() / to.ml_per_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beer_ethanol_grams() {
        let grams = to_ethanol_grams(330.0, 4.5);
        assert!((grams - 11.716_65).abs() < 1e-4);
    }

    #[test]
    fn test_ethanol_grams_monotonic() {
        let volumes = [0.0, 10.0, 45.0, 150.0, 330.0, 500.0];
        let abvs = [0.0, 4.5, 12.0, 40.0, 100.0];

        for pair in volumes.windows(2) {
            for abv in abvs {
                assert!(to_ethanol_grams(pair[0], abv) <= to_ethanol_grams(pair[1], abv));
            }
        }
        for pair in abvs.windows(2) {
            for volume in volumes {
                assert!(to_ethanol_grams(volume, pair[0]) <= to_ethanol_grams(volume, pair[1]));
            }
        }
    }

    #[test]
    fn test_negative_inputs_clamp_to_zero() {
        assert_eq!(to_ethanol_grams(-330.0, 4.5), 0.0);
        assert_eq!(to_ethanol_grams(330.0, -4.5), 0.0);
        assert_eq!(
            convert_volume(-2.0, VolumeUnit::FluidOunce, VolumeUnit::Milliliter),
            0.0
        );
    }

    #[test]
    fn test_convert_volume() {
        let ml = convert_volume(1.5, VolumeUnit::FluidOunce, VolumeUnit::Milliliter);
        assert!((ml - 44.355).abs() < 1e-9);

        let oz = convert_volume(29.57, VolumeUnit::Milliliter, VolumeUnit::FluidOunce);
        assert!((oz - 1.0).abs() < 1e-9);

        assert_eq!(
            convert_volume(250.0, VolumeUnit::Milliliter, VolumeUnit::Milliliter),
            250.0
        );
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("ml".parse::<VolumeUnit>().unwrap(), VolumeUnit::Milliliter);
        assert_eq!("FL-OZ".parse::<VolumeUnit>().unwrap(), VolumeUnit::FluidOunce);
        assert_eq!("oz".parse::<VolumeUnit>().unwrap(), VolumeUnit::FluidOunce);
        assert!("cups".parse::<VolumeUnit>().is_err());
    }
}
