//! Accessibility setting toggles
//!
//! Every feature follows the same policy: write its setting keys directly,
//! and if that is refused hand the user off to the first settings surface in
//! its ranked list that opens. Features gated on a newer host fail up front
//! without touching the ladder.

use std::fmt;

use devbridge_core::prelude::*;
use devbridge_core::FallbackOutcome;
use devbridge_host::platform::{SDK_CAPTIONING, SDK_FLASH_NOTIFICATIONS, SDK_HIGH_TEXT_CONTRAST};
use devbridge_host::surfaces::{
    ACCESSIBILITY, CAPTIONING, DEVELOPMENT, DISPLAY, INPUT_METHOD, ONE_HANDED, SETTINGS, SOUND,
    VOICE_INPUT,
};
use devbridge_host::{keys, Host, SettingKey, SettingValue, SettingsSurface};

use crate::ladder::FallbackLadder;

// ─────────────────────────────────────────────────────────────────────────────
// Feature parameters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
    Max,
}

impl TextSize {
    /// Parse a size name; anything unrecognised is medium
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "small" => TextSize::Small,
            "medium" => TextSize::Medium,
            "large" => TextSize::Large,
            "max" => TextSize::Max,
            other => {
                debug!("Unknown text size {:?}, using medium", other);
                TextSize::Medium
            }
        }
    }

    pub fn font_scale(self) -> f32 {
        match self {
            TextSize::Small => 0.85,
            TextSize::Medium => 1.0,
            TextSize::Large => 1.15,
            TextSize::Max => 1.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HapticStrength {
    Light,
    #[default]
    Medium,
    Strong,
}

impl HapticStrength {
    /// Parse a strength name; anything unrecognised is medium
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => HapticStrength::Light,
            "medium" => HapticStrength::Medium,
            "strong" => HapticStrength::Strong,
            other => {
                debug!("Unknown haptic strength {:?}, using medium", other);
                HapticStrength::Medium
            }
        }
    }

    /// Vibration intensity out of 255
    pub fn intensity(self) -> i32 {
        match self {
            HapticStrength::Light => 50,
            HapticStrength::Medium => 100,
            HapticStrength::Strong => 255,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Features
// ─────────────────────────────────────────────────────────────────────────────

/// An accessibility feature with its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccessibilityFeature {
    TextSize(TextSize),
    HighContrast,
    AnimationScale(f32),
    Captions,
    FlashAlerts,
    HapticStrength(HapticStrength),
    OneHandedMode,
    VoiceTyping,
}

/// One key written by a feature.
///
/// A write that is not `required` is additive: its failure is logged and
/// does not fail the direct-write rung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingWrite {
    pub key: SettingKey,
    pub value: SettingValue,
    pub required: bool,
}

impl SettingWrite {
    fn required(key: SettingKey, value: SettingValue) -> Self {
        Self {
            key,
            value,
            required: true,
        }
    }

    fn additive(key: SettingKey, value: SettingValue) -> Self {
        Self {
            key,
            value,
            required: false,
        }
    }
}

impl AccessibilityFeature {
    /// Animation scale feature; `scale` must be finite and not negative
    pub fn animation_scale(scale: f64) -> Result<Self> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(Error::invalid_argument(format!(
                "animation scale must be a non-negative number, got {}",
                scale
            )));
        }
        Ok(AccessibilityFeature::AnimationScale(scale as f32))
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccessibilityFeature::TextSize(_) => "Text size",
            AccessibilityFeature::HighContrast => "High contrast text",
            AccessibilityFeature::AnimationScale(_) => "Animation scale",
            AccessibilityFeature::Captions => "Captions",
            AccessibilityFeature::FlashAlerts => "Flash alerts",
            AccessibilityFeature::HapticStrength(_) => "Haptic strength",
            AccessibilityFeature::OneHandedMode => "One-handed mode",
            AccessibilityFeature::VoiceTyping => "Voice typing",
        }
    }

    /// Minimum host API level, if the feature is gated
    pub fn min_sdk(&self) -> Option<u32> {
        match self {
            AccessibilityFeature::HighContrast => Some(SDK_HIGH_TEXT_CONTRAST),
            AccessibilityFeature::Captions => Some(SDK_CAPTIONING),
            AccessibilityFeature::FlashAlerts => Some(SDK_FLASH_NOTIFICATIONS),
            _ => None,
        }
    }

    /// Keys written by the direct-write rung, empty for surface-only features
    pub fn writes(&self) -> Vec<SettingWrite> {
        match *self {
            AccessibilityFeature::TextSize(size) => vec![SettingWrite::required(
                keys::FONT_SCALE,
                SettingValue::Float(size.font_scale()),
            )],
            AccessibilityFeature::HighContrast => vec![
                SettingWrite::required(keys::HIGH_TEXT_CONTRAST_ENABLED, SettingValue::Int(1)),
                SettingWrite::additive(keys::DISPLAY_INVERSION_ENABLED, SettingValue::Int(1)),
            ],
            AccessibilityFeature::AnimationScale(scale) => [
                keys::WINDOW_ANIMATION_SCALE,
                keys::TRANSITION_ANIMATION_SCALE,
                keys::ANIMATOR_DURATION_SCALE,
            ]
            .into_iter()
            .map(|key| SettingWrite::required(key, SettingValue::Float(scale)))
            .collect(),
            AccessibilityFeature::Captions => vec![SettingWrite::required(
                keys::CAPTIONING_ENABLED,
                SettingValue::Int(1),
            )],
            AccessibilityFeature::FlashAlerts => vec![
                SettingWrite::required(keys::CAMERA_FLASH_NOTIFICATION, SettingValue::Int(1)),
                SettingWrite::required(keys::SCREEN_FLASH_NOTIFICATION, SettingValue::Int(1)),
            ],
            AccessibilityFeature::HapticStrength(strength) => vec![SettingWrite::required(
                keys::HAPTIC_FEEDBACK_INTENSITY,
                SettingValue::Int(strength.intensity()),
            )],
            AccessibilityFeature::OneHandedMode | AccessibilityFeature::VoiceTyping => Vec::new(),
        }
    }

    /// Settings surfaces to try, best first
    pub fn fallback_surfaces(&self) -> &'static [SettingsSurface] {
        const TEXT_SIZE: &[SettingsSurface] = &[DISPLAY, ACCESSIBILITY, SETTINGS];
        const HIGH_CONTRAST: &[SettingsSurface] = &[ACCESSIBILITY, SETTINGS];
        const ANIMATION: &[SettingsSurface] = &[DEVELOPMENT, ACCESSIBILITY, SETTINGS];
        const CAPTIONS: &[SettingsSurface] = &[CAPTIONING, ACCESSIBILITY];
        const FLASH: &[SettingsSurface] = &[ACCESSIBILITY];
        const HAPTICS: &[SettingsSurface] = &[SOUND, ACCESSIBILITY, SETTINGS];
        const ONE_HANDED_MODE: &[SettingsSurface] = &[ONE_HANDED, DISPLAY, ACCESSIBILITY];
        const VOICE: &[SettingsSurface] = &[VOICE_INPUT, INPUT_METHOD, SETTINGS];

        match self {
            AccessibilityFeature::TextSize(_) => TEXT_SIZE,
            AccessibilityFeature::HighContrast => HIGH_CONTRAST,
            AccessibilityFeature::AnimationScale(_) => ANIMATION,
            AccessibilityFeature::Captions => CAPTIONS,
            AccessibilityFeature::FlashAlerts => FLASH,
            AccessibilityFeature::HapticStrength(_) => HAPTICS,
            AccessibilityFeature::OneHandedMode => ONE_HANDED_MODE,
            AccessibilityFeature::VoiceTyping => VOICE,
        }
    }

    /// Message reported when every path is exhausted
    pub fn failure_message(&self) -> &'static str {
        match self {
            AccessibilityFeature::TextSize(_) => "Cannot change text size",
            AccessibilityFeature::HighContrast => "Cannot enable high contrast",
            AccessibilityFeature::AnimationScale(_) => "Cannot set animation scale",
            AccessibilityFeature::Captions => "Cannot enable captions",
            AccessibilityFeature::FlashAlerts => "Cannot enable flash alerts",
            AccessibilityFeature::HapticStrength(_) => "Cannot set haptic strength",
            AccessibilityFeature::OneHandedMode => "Cannot open one-handed mode settings",
            AccessibilityFeature::VoiceTyping => "Cannot enable voice typing",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// How a toggle took effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TogglePath {
    /// Setting keys were written
    DirectWrite,
    /// The user was sent to a settings surface to finish the change
    SurfaceHandoff(SettingsSurface),
}

impl fmt::Display for TogglePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TogglePath::DirectWrite => write!(f, "direct write"),
            TogglePath::SurfaceHandoff(surface) => write!(f, "handoff to {}", surface),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleReport {
    pub outcome: FallbackOutcome,
    pub path: TogglePath,
}

#[derive(Debug, Clone)]
pub struct ToggleDispatcher {
    host: Host,
}

impl ToggleDispatcher {
    pub fn new(host: Host) -> Self {
        Self { host }
    }

    /// Apply `feature`, returning the path that took effect.
    ///
    /// Errors with [`Error::Unavailable`] when the host is too old for the
    /// feature, and [`Error::Transient`] with the feature's message when
    /// neither the write nor any surface worked.
    pub fn apply_toggle(&self, feature: &AccessibilityFeature) -> Result<ToggleReport> {
        if let Some(min_sdk) = feature.min_sdk() {
            if let Some(message) = self.host.info.unsupported_message(feature.name(), min_sdk) {
                warn!("{}", message);
                return Err(Error::unavailable(message));
            }
        }

        let writes = feature.writes();
        let mut ladder = FallbackLadder::new(feature.name());
        if !writes.is_empty() {
            ladder = ladder.rung(TogglePath::DirectWrite, || self.write_all(&writes));
        }
        for surface in feature.fallback_surfaces() {
            ladder = ladder.rung(TogglePath::SurfaceHandoff(surface.clone()), move || {
                self.host.surfaces.open(surface)?;
                Ok(FallbackOutcome::Applied)
            });
        }

        let result = ladder.climb();
        match result.path {
            Some(path) if result.outcome.is_success() => {
                info!("{} applied via {}", feature.name(), path);
                Ok(ToggleReport {
                    outcome: result.outcome,
                    path,
                })
            }
            _ => Err(Error::transient(feature.failure_message())),
        }
    }

    /// Write every key, restoring already-written required keys if a later
    /// required write fails.
    ///
    /// Prior values of required keys are read before anything is written; if
    /// one cannot be read the rung fails without touching the store.
    fn write_all(&self, writes: &[SettingWrite]) -> Result<FallbackOutcome> {
        let settings = &self.host.settings;

        let mut priors: Vec<(SettingKey, PriorValue)> = Vec::new();
        for write in writes.iter().filter(|w| w.required) {
            let prior = match settings.get(&write.key) {
                Ok(Some(value)) => PriorValue::Set(value),
                Ok(None) => PriorValue::Absent,
                Err(e) => {
                    warn!(
                        "Cannot read {} before writing, skipping direct write: {}",
                        write.key, e
                    );
                    return Err(e);
                }
            };
            priors.push((write.key, prior));
        }

        let mut written: Vec<(SettingKey, PriorValue)> = Vec::new();
        for write in writes {
            match settings.put(&write.key, write.value) {
                Ok(()) => {
                    debug!("Wrote {} = {}", write.key, write.value);
                    if let Some(entry) = priors.iter().find(|(key, _)| *key == write.key) {
                        written.push(*entry);
                    }
                }
                Err(e) if !write.required => {
                    warn!("Optional write of {} failed: {}", write.key, e);
                }
                Err(e) => {
                    self.restore(&written);
                    return Err(e);
                }
            }
        }

        Ok(FallbackOutcome::Applied)
    }

    fn restore(&self, written: &[(SettingKey, PriorValue)]) {
        for (key, prior) in written.iter().rev() {
            let restored = match prior {
                PriorValue::Set(value) => self.host.settings.put(key, *value),
                PriorValue::Absent => self.host.settings.reset(key),
            };
            if let Err(e) = restored {
                warn!("Failed to restore {} after partial write: {}", key, e);
            }
        }
    }
}

/// What a required key held before the direct write
#[derive(Debug, Clone, Copy, PartialEq)]
enum PriorValue {
    Set(SettingValue),
    Absent,
}
