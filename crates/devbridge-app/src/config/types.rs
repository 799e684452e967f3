//! Configuration types for devbridge
//!
//! Defines:
//! - `Settings` - Contents of `.devbridge/config.toml`
//! - `BrightnessSettings` - Curve selection and calibration
//! - `AccessibilitySettings` - Startup state of the accessibility service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use devbridge_core::prelude::*;
use devbridge_core::DEFAULT_MAX_BRIGHTNESS;
use devbridge_host::DeviceProfile;

use crate::brightness::{BrightnessCurve, CalibrationTable, DEFAULT_GAMMA};

/// Global settings from config.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub brightness: BrightnessSettings,

    /// Simulated host the binary runs against
    #[serde(default)]
    pub device: DeviceProfile,

    #[serde(default)]
    pub accessibility: AccessibilitySettings,
}

impl Settings {
    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.brightness.build_curve().map(|_| ())
    }
}

/// Which brightness curve strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    #[default]
    Gamma,
    Calibrated,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BrightnessSettings {
    #[serde(default)]
    pub curve: CurveKind,

    /// Exponent for the gamma curve
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// Device maximum brightness level
    #[serde(default = "default_max_level")]
    pub max_level: u16,

    /// `[upper_bound_percent, level]` pairs; built-in table when absent
    #[serde(default)]
    pub calibration: Option<Vec<(u8, u16)>>,
}

fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}

fn default_max_level() -> u16 {
    DEFAULT_MAX_BRIGHTNESS
}

impl Default for BrightnessSettings {
    fn default() -> Self {
        Self {
            curve: CurveKind::default(),
            gamma: default_gamma(),
            max_level: default_max_level(),
            calibration: None,
        }
    }
}

impl BrightnessSettings {
    pub fn curve_name(&self) -> &'static str {
        match self.curve {
            CurveKind::Gamma => "gamma",
            CurveKind::Calibrated => "calibrated",
        }
    }

    /// Build the configured curve, validating its parameters
    pub fn build_curve(&self) -> Result<BrightnessCurve> {
        match self.curve {
            CurveKind::Gamma => BrightnessCurve::gamma(self.gamma, self.max_level),
            CurveKind::Calibrated => {
                let table = match &self.calibration {
                    Some(points) => CalibrationTable::new(points, self.max_level)?,
                    None if self.max_level == 0 => {
                        return Err(Error::config_invalid(
                            "max brightness level must be positive",
                        ))
                    }
                    None => CalibrationTable::reference(self.max_level),
                };
                Ok(BrightnessCurve::calibrated(table))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessibilitySettings {
    /// Connect the accessibility service at startup
    #[serde(default)]
    pub enabled: bool,

    /// JSON file holding the foreground screen tree
    #[serde(default)]
    pub screen_fixture: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_curve_is_reference_gamma() {
        let curve = BrightnessSettings::default().build_curve().unwrap();
        assert_eq!(curve, BrightnessCurve::default());
    }

    #[test]
    fn test_calibrated_without_table_uses_reference() {
        let settings = BrightnessSettings {
            curve: CurveKind::Calibrated,
            max_level: 100,
            ..Default::default()
        };
        let curve = settings.build_curve().unwrap();
        assert_eq!(
            curve,
            BrightnessCurve::calibrated(CalibrationTable::reference(100))
        );
    }

    #[test]
    fn test_invalid_calibration_rejected() {
        let settings = BrightnessSettings {
            curve: CurveKind::Calibrated,
            calibration: Some(vec![(50, 100), (40, 120)]),
            ..Default::default()
        };
        let err = settings.build_curve().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_zero_max_level_rejected_for_both_curves() {
        for curve in [CurveKind::Gamma, CurveKind::Calibrated] {
            let settings = BrightnessSettings {
                curve,
                max_level: 0,
                ..Default::default()
            };
            assert!(settings.build_curve().is_err());
        }
    }
}
