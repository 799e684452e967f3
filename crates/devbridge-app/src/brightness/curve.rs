//! Percent to device-level brightness curves
//!
//! Two strategies, both monotonically non-decreasing over `0..=100` with
//! `0` mapping to a visible level and `100` mapping to the device maximum:
//!
//! - [`BrightnessCurve::Gamma`] - continuous power curve
//! - [`BrightnessCurve::Calibrated`] - discrete breakpoint table

use devbridge_core::prelude::*;
use devbridge_core::{BrightnessRequest, DeviceBrightnessLevel, DEFAULT_MAX_BRIGHTNESS};

/// Reference gamma for perceptual brightness
pub const DEFAULT_GAMMA: f64 = 2.2;

/// Built-in calibration against a 255-level panel
const REFERENCE_TABLE: &[(u8, u16)] = &[
    (5, 1),
    (10, 4),
    (20, 10),
    (30, 20),
    (40, 34),
    (50, 52),
    (60, 76),
    (70, 105),
    (80, 140),
    (90, 185),
    (100, 255),
];

/// One calibration point: percents up to `upper_percent` map to `level`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub upper_percent: u8,
    pub level: u16,
}

/// Validated, ordered calibration breakpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationTable {
    breakpoints: Vec<Breakpoint>,
    max: u16,
}

impl CalibrationTable {
    /// Build a table from `(upper_bound_percent, level)` pairs.
    ///
    /// Bounds must be strictly increasing and at most 100; levels must be
    /// non-decreasing and within `[1, max]`.
    pub fn new(points: &[(u8, u16)], max: u16) -> Result<Self> {
        if max == 0 {
            return Err(Error::config_invalid("max brightness level must be positive"));
        }
        if points.is_empty() {
            return Err(Error::config_invalid("calibration table is empty"));
        }

        let mut breakpoints = Vec::with_capacity(points.len());
        let mut previous: Option<Breakpoint> = None;

        for &(upper_percent, level) in points {
            if upper_percent > 100 {
                return Err(Error::config_invalid(format!(
                    "calibration bound {} exceeds 100",
                    upper_percent
                )));
            }
            if level == 0 || level > max {
                return Err(Error::config_invalid(format!(
                    "calibration level {} outside [1, {}]",
                    level, max
                )));
            }
            if let Some(prev) = previous {
                if upper_percent <= prev.upper_percent {
                    return Err(Error::config_invalid(format!(
                        "calibration bounds not strictly increasing at {}",
                        upper_percent
                    )));
                }
                if level < prev.level {
                    return Err(Error::config_invalid(format!(
                        "calibration level decreases at {}% ({} < {})",
                        upper_percent, level, prev.level
                    )));
                }
            }

            let point = Breakpoint {
                upper_percent,
                level,
            };
            breakpoints.push(point);
            previous = Some(point);
        }

        Ok(Self { breakpoints, max })
    }

    /// The built-in table, rescaled to `max`
    pub fn reference(max: u16) -> Self {
        let max = max.max(1);
        let breakpoints = REFERENCE_TABLE
            .iter()
            .map(|&(upper_percent, level)| {
                let scaled = (u32::from(level) * u32::from(max) + 127) / 255;
                Breakpoint {
                    upper_percent,
                    level: scaled.clamp(1, u32::from(max)) as u16,
                }
            })
            .collect();
        Self { breakpoints, max }
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    /// Level of the first breakpoint whose bound is at least `percent`.
    ///
    /// `100`, and anything beyond the last bound, maps to the maximum.
    pub fn lookup(&self, request: BrightnessRequest) -> DeviceBrightnessLevel {
        let percent = request.percent();
        if percent >= 100 {
            return DeviceBrightnessLevel::full(self.max);
        }

        match self
            .breakpoints
            .iter()
            .find(|point| point.upper_percent >= percent)
        {
            Some(point) => DeviceBrightnessLevel::new(i64::from(point.level), self.max),
            None => DeviceBrightnessLevel::full(self.max),
        }
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::reference(DEFAULT_MAX_BRIGHTNESS)
    }
}

/// A deterministic mapping from user percent to device level
#[derive(Debug, Clone, PartialEq)]
pub enum BrightnessCurve {
    Gamma { gamma: f64, max: u16 },
    Calibrated(CalibrationTable),
}

impl BrightnessCurve {
    /// Gamma curve; `gamma` must be finite and positive
    pub fn gamma(gamma: f64, max: u16) -> Result<Self> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(Error::config_invalid(format!(
                "gamma must be a positive number, got {}",
                gamma
            )));
        }
        if max == 0 {
            return Err(Error::config_invalid("max brightness level must be positive"));
        }
        Ok(Self::Gamma { gamma, max })
    }

    pub fn calibrated(table: CalibrationTable) -> Self {
        Self::Calibrated(table)
    }

    pub fn max(&self) -> u16 {
        match self {
            BrightnessCurve::Gamma { max, .. } => *max,
            BrightnessCurve::Calibrated(table) => table.max(),
        }
    }

    /// Map a request to a device level in `[1, max]`
    pub fn level(&self, request: BrightnessRequest) -> DeviceBrightnessLevel {
        match self {
            BrightnessCurve::Gamma { gamma, max } => {
                let scaled = request.fraction().powf(*gamma) * f64::from(*max);
                DeviceBrightnessLevel::new(scaled.round() as i64, *max)
            }
            BrightnessCurve::Calibrated(table) => table.lookup(request),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BrightnessCurve::Gamma { .. } => "gamma",
            BrightnessCurve::Calibrated(_) => "calibrated",
        }
    }
}

impl Default for BrightnessCurve {
    fn default() -> Self {
        Self::Gamma {
            gamma: DEFAULT_GAMMA,
            max: DEFAULT_MAX_BRIGHTNESS,
        }
    }
}
