//! Method dispatch
//!
//! Maps named method-channel calls onto the engines. Every call produces a
//! response; engine errors are reduced to a short code and a caller-facing
//! message before they leave this module.

use std::fmt;

use devbridge_core::prelude::*;
use devbridge_core::{FallbackOutcome, MethodCall, MethodResponse};
use devbridge_host::surfaces::ACCESSIBILITY;
use devbridge_host::{Host, SettingsSurface};

use crate::accessibility::{registry, AccessibilityRegistry};
use crate::brightness::{BrightnessController, BrightnessCurve};
use crate::launcher::AppLauncher;
use crate::toggles::{AccessibilityFeature, HapticStrength, TextSize, ToggleDispatcher};
use crate::volume::{VolumeController, DEFAULT_VOLUME_LEVEL};

/// Brightness percent used when the caller omits one
pub const DEFAULT_BRIGHTNESS_PERCENT: i64 = 50;

/// Animation multiplier used when the caller omits one
pub const DEFAULT_ANIMATION_SCALE: f64 = 1.0;

/// Operations the bridge recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    SetBrightness,
    SetVolume,
    RequestWriteSettings,
    CanWriteSettings,
    SetTextSize,
    SetHighContrast,
    SetAnimationScale,
    EnableVoiceTyping,
    EnableCaptions,
    EnableFlashAlerts,
    SetHapticStrength,
    EnableOneHandedMode,
    IsAccessibilityEnabled,
    OpenAccessibilitySettings,
    ReadScreenContent,
    LaunchApp,
    LaunchGmailApp,
    LaunchWeatherApp,
}

impl Method {
    pub const ALL: &'static [Method] = &[
        Method::SetBrightness,
        Method::SetVolume,
        Method::RequestWriteSettings,
        Method::CanWriteSettings,
        Method::SetTextSize,
        Method::SetHighContrast,
        Method::SetAnimationScale,
        Method::EnableVoiceTyping,
        Method::EnableCaptions,
        Method::EnableFlashAlerts,
        Method::SetHapticStrength,
        Method::EnableOneHandedMode,
        Method::IsAccessibilityEnabled,
        Method::OpenAccessibilitySettings,
        Method::ReadScreenContent,
        Method::LaunchApp,
        Method::LaunchGmailApp,
        Method::LaunchWeatherApp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::SetBrightness => "setBrightness",
            Method::SetVolume => "setVolume",
            Method::RequestWriteSettings => "requestWriteSettings",
            Method::CanWriteSettings => "canWriteSettings",
            Method::SetTextSize => "setTextSize",
            Method::SetHighContrast => "setHighContrast",
            Method::SetAnimationScale => "setAnimationScale",
            Method::EnableVoiceTyping => "enableVoiceTyping",
            Method::EnableCaptions => "enableCaptions",
            Method::EnableFlashAlerts => "enableFlashAlerts",
            Method::SetHapticStrength => "setHapticStrength",
            Method::EnableOneHandedMode => "enableOneHandedMode",
            Method::IsAccessibilityEnabled => "isAccessibilityEnabled",
            Method::OpenAccessibilitySettings => "openAccessibilitySettings",
            Method::ReadScreenContent => "readScreenContent",
            Method::LaunchApp => "launchApp",
            Method::LaunchGmailApp => "launchGmailApp",
            Method::LaunchWeatherApp => "launchWeatherApp",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes method calls to the engines
#[derive(Debug)]
pub struct Bridge {
    host: Host,
    brightness: BrightnessController,
    toggles: ToggleDispatcher,
    volume: VolumeController,
    launcher: AppLauncher,
    accessibility: &'static AccessibilityRegistry,
}

impl Bridge {
    /// Bridge over `host`, reading the screen through the process-wide registry
    pub fn new(host: Host, curve: BrightnessCurve) -> Self {
        Self {
            brightness: BrightnessController::new(host.clone(), curve),
            toggles: ToggleDispatcher::new(host.clone()),
            volume: VolumeController::new(host.audio.clone()),
            launcher: AppLauncher::new(host.packages.clone()),
            accessibility: registry(),
            host,
        }
    }

    /// Builder: read the screen through a different registry
    pub fn with_registry(mut self, registry: &'static AccessibilityRegistry) -> Self {
        self.accessibility = registry;
        self
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn accessibility(&self) -> &'static AccessibilityRegistry {
        self.accessibility
    }

    /// Handle one call; never panics on caller input
    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        let Some(method) = Method::parse(&call.method) else {
            debug!("Unknown method {:?}", call.method);
            return MethodResponse::NotImplemented;
        };
        debug!("Dispatching {}", method);

        let response = match method {
            Method::SetBrightness => self.set_brightness(call),
            Method::SetVolume => self.set_volume(call),
            Method::RequestWriteSettings => self.request_write_settings(),
            Method::CanWriteSettings => MethodResponse::success(self.can_write_settings()),
            Method::SetTextSize => {
                let size = TextSize::parse(call.arg_str("size").unwrap_or_default());
                self.toggle(AccessibilityFeature::TextSize(size))
            }
            Method::SetHighContrast => self.toggle(AccessibilityFeature::HighContrast),
            Method::SetAnimationScale => {
                let scale = call.arg_f64("scale").unwrap_or(DEFAULT_ANIMATION_SCALE);
                match AccessibilityFeature::animation_scale(scale) {
                    Ok(feature) => self.toggle(feature),
                    Err(e) => MethodResponse::from_error(&e, e.message()),
                }
            }
            Method::EnableVoiceTyping => self.toggle(AccessibilityFeature::VoiceTyping),
            Method::EnableCaptions => self.toggle(AccessibilityFeature::Captions),
            Method::EnableFlashAlerts => self.toggle(AccessibilityFeature::FlashAlerts),
            Method::SetHapticStrength => {
                let strength =
                    HapticStrength::parse(call.arg_str("strength").unwrap_or_default());
                self.toggle(AccessibilityFeature::HapticStrength(strength))
            }
            Method::EnableOneHandedMode => self.toggle(AccessibilityFeature::OneHandedMode),
            Method::IsAccessibilityEnabled => {
                MethodResponse::success(self.accessibility.is_enabled())
            }
            Method::OpenAccessibilitySettings => self.open_accessibility_settings(),
            Method::ReadScreenContent => match self.accessibility.read_screen() {
                Ok(text) => MethodResponse::success(text),
                Err(e) => {
                    warn!("readScreenContent failed: {}", e);
                    MethodResponse::from_error(&e, e.message())
                }
            },
            Method::LaunchApp => match call.arg_str("packageName") {
                Some(package) => self.launch(self.launcher.launch_app(package)),
                None => MethodResponse::error("INVALID_ARGUMENT", "packageName is required"),
            },
            Method::LaunchGmailApp => self.launch(self.launcher.launch_gmail()),
            Method::LaunchWeatherApp => self.launch(self.launcher.launch_weather().map(|_| ())),
        };

        if let MethodResponse::Error { code, message } = &response {
            debug!("{} -> {} ({})", method, code, message);
        }
        response
    }

    fn set_brightness(&self, call: &MethodCall) -> MethodResponse {
        let percent = call
            .arg_i64("brightness")
            .unwrap_or(DEFAULT_BRIGHTNESS_PERCENT);
        match self.brightness.apply_brightness(percent) {
            FallbackOutcome::Applied | FallbackOutcome::AppliedLocally => {
                MethodResponse::success(true)
            }
            FallbackOutcome::Failed => {
                MethodResponse::error("PERMISSION_DENIED", "Cannot modify system settings")
            }
        }
    }

    fn set_volume(&self, call: &MethodCall) -> MethodResponse {
        let level = call.arg_i64("level").unwrap_or(DEFAULT_VOLUME_LEVEL);
        match self.volume.set_volume(level) {
            Ok(_) => MethodResponse::success(true),
            Err(e) => {
                warn!("setVolume failed: {}", e);
                MethodResponse::error("FAILED", "Cannot set volume")
            }
        }
    }

    /// True on hosts without the write gate, else the store's grant state
    pub fn can_write_settings(&self) -> bool {
        !self.host.info.has_write_settings_gate() || self.host.settings.can_write()
    }

    fn request_write_settings(&self) -> MethodResponse {
        if self.can_write_settings() {
            return MethodResponse::success(true);
        }

        let surface = SettingsSurface::manage_write_settings(&self.host.info.package_name);
        match self.host.surfaces.open(&surface) {
            Ok(()) => {
                info!("Opened {} for the user to grant write access", surface);
                MethodResponse::success(false)
            }
            Err(e) => {
                warn!("Failed to open {}: {}", surface, e);
                MethodResponse::error("FAILED", "Cannot open write settings screen")
            }
        }
    }

    fn open_accessibility_settings(&self) -> MethodResponse {
        match self.host.surfaces.open(&ACCESSIBILITY) {
            Ok(()) => MethodResponse::success(true),
            Err(e) => {
                warn!("Failed to open accessibility settings: {}", e);
                MethodResponse::error("UNAVAILABLE", "Cannot open accessibility settings")
            }
        }
    }

    fn toggle(&self, feature: AccessibilityFeature) -> MethodResponse {
        match self.toggles.apply_toggle(&feature) {
            Ok(_) => MethodResponse::success(true),
            Err(e) => MethodResponse::from_error(&e, e.message()),
        }
    }

    fn launch(&self, result: Result<()>) -> MethodResponse {
        match result {
            Ok(()) => MethodResponse::success(true),
            Err(e) => MethodResponse::from_error(&e, e.message()),
        }
    }
}
