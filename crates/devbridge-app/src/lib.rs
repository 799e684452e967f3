//! # devbridge-app - Settings Engines and Method Dispatch
//!
//! The decision logic of the bridge, written against the host seams in
//! [`devbridge_host`]:
//!
//! - [`brightness`] - Brightness curves and the system/window fallback ladder
//! - [`toggles`] - Accessibility toggles with direct-write then surface handoff
//! - [`accessibility`] - Process-wide accessibility service and screen reader
//! - [`volume`] / [`launcher`] - Media volume and app launching
//! - [`ladder`] - Generic ordered fallback strategies
//! - [`config`] - `.devbridge/config.toml` loading
//! - [`dispatch`] - Maps method-channel calls onto the engines
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use devbridge_app::{Bridge, BrightnessCurve};
//! use devbridge_core::MethodCall;
//! use devbridge_host::{Host, SimulatedDevice};
//!
//! let bridge = Bridge::new(
//!     Host::simulated(Arc::new(SimulatedDevice::default())),
//!     BrightnessCurve::default(),
//! );
//! let response = bridge.handle(&MethodCall::new("setBrightness").arg("brightness", 40));
//! assert!(response.is_success());
//! ```

pub mod accessibility;
pub mod brightness;
pub mod config;
pub mod dispatch;
pub mod ladder;
pub mod launcher;
pub mod toggles;
pub mod volume;

pub use accessibility::{
    extract_text, registry, AccessibilityRegistry, AccessibilityService, ServiceInfo,
    ServiceState,
};
pub use brightness::{
    BrightnessController, BrightnessCurve, BrightnessPath, BrightnessReport, CalibrationTable,
};
pub use config::{load_settings, load_settings_strict, Settings};
pub use dispatch::{Bridge, Method};
pub use ladder::{FallbackLadder, LadderResult};
pub use launcher::AppLauncher;
pub use toggles::{
    AccessibilityFeature, HapticStrength, TextSize, ToggleDispatcher, TogglePath, ToggleReport,
};
pub use volume::{VolumeChange, VolumeController};
