//! Core brightness and outcome types

use serde::{Deserialize, Serialize};

/// Reference device maximum brightness level (8-bit backlight scale)
pub const DEFAULT_MAX_BRIGHTNESS: u16 = 255;

/// A user-facing brightness percentage, clamped to `[0, 100]` on construction.
///
/// Out-of-range input is never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BrightnessRequest(u8);

impl BrightnessRequest {
    pub fn new(percent: i64) -> Self {
        Self(percent.clamp(0, 100) as u8)
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Fraction of full scale in `[0.0, 1.0]`
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl From<i64> for BrightnessRequest {
    fn from(percent: i64) -> Self {
        Self::new(percent)
    }
}

/// An absolute device brightness level, always within `[1, max]`.
///
/// Zero is never representable: it would blank the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceBrightnessLevel {
    value: u16,
    max: u16,
}

impl DeviceBrightnessLevel {
    /// Build a level, clamping `value` into `[1, max]`.
    pub fn new(value: i64, max: u16) -> Self {
        let max = max.max(1);
        Self {
            value: value.clamp(1, i64::from(max)) as u16,
            max,
        }
    }

    /// The full-scale level for a device
    pub fn full(max: u16) -> Self {
        Self::new(i64::from(max), max)
    }

    pub fn value(self) -> u16 {
        self.value
    }

    pub fn max(self) -> u16 {
        self.max
    }

    /// `value / max`, used for per-window overrides
    pub fn normalized(self) -> f32 {
        f32::from(self.value) / f32::from(self.max)
    }

    /// Approximate percentage for log output
    pub fn approx_percent(self) -> u32 {
        (u32::from(self.value) * 100) / u32::from(self.max)
    }
}

impl std::fmt::Display for DeviceBrightnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.value, self.max)
    }
}

/// Result of one attempt to apply a change on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackOutcome {
    /// Durable and visible system-wide
    Applied,
    /// Visible only within this process's own display surface
    AppliedLocally,
    /// No visible effect
    Failed,
}

impl FallbackOutcome {
    pub fn is_success(self) -> bool {
        !matches!(self, FallbackOutcome::Failed)
    }
}

impl std::fmt::Display for FallbackOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackOutcome::Applied => write!(f, "applied"),
            FallbackOutcome::AppliedLocally => write!(f, "applied locally"),
            FallbackOutcome::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_request_clamps() {
        assert_eq!(BrightnessRequest::new(-20).percent(), 0);
        assert_eq!(BrightnessRequest::new(150).percent(), 100);
        assert_eq!(BrightnessRequest::new(42).percent(), 42);
    }

    #[test]
    fn test_device_level_never_zero() {
        let level = DeviceBrightnessLevel::new(0, 255);
        assert_eq!(level.value(), 1);
    }

    #[test]
    fn test_device_level_caps_at_max() {
        let level = DeviceBrightnessLevel::new(4000, 255);
        assert_eq!(level.value(), 255);
        assert_eq!(DeviceBrightnessLevel::full(1023).value(), 1023);
    }

    #[test]
    fn test_device_level_normalized() {
        let level = DeviceBrightnessLevel::full(255);
        assert_eq!(level.normalized(), 1.0);

        let level = DeviceBrightnessLevel::new(51, 255);
        assert!((level.normalized() - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_device_level_display() {
        assert_eq!(DeviceBrightnessLevel::new(128, 255).to_string(), "128/255");
    }

    #[test]
    fn test_fallback_outcome_success() {
        assert!(FallbackOutcome::Applied.is_success());
        assert!(FallbackOutcome::AppliedLocally.is_success());
        assert!(!FallbackOutcome::Failed.is_success());
    }
}
