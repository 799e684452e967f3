//! # devbridge-host - Host Capability Seams
//!
//! Everything the bridge needs from the host operating system, expressed as
//! traits so the engines in `devbridge-app` never talk to the host directly.
//!
//! Depends on [`devbridge_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Seams
//! - [`SettingsStore`] - Persistent system/secure/global settings
//! - [`DisplaySurface`] - This process's own window brightness
//! - [`SystemBroadcaster`] - System-wide notifications
//! - [`SurfaceLauncher`] - Opening host settings screens
//! - [`AudioControl`] - Stream volume
//! - [`PackageLauncher`] - Launching other applications
//! - [`WindowInspector`] - Active window UI tree for the accessibility service
//!
//! ### Platform
//! - [`HostInfo`] - API level and own package name
//! - [`Host`] - Bundle of all seams handed to the engines
//!
//! ### Simulation
//! - [`SimulatedDevice`], [`DeviceProfile`] - In-memory device for headless runs

pub mod audio;
pub mod display;
pub mod inspector;
pub mod packages;
pub mod platform;
pub mod settings;
pub mod simulated;
pub mod surfaces;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

use std::sync::Arc;

pub use audio::{AudioControl, AudioStream};
pub use display::{Broadcast, DisplaySurface, SystemBroadcaster, WindowBrightness};
pub use inspector::{AccessibilityEvent, AccessibilityEventType, WindowInspector};
pub use packages::PackageLauncher;
pub use platform::HostInfo;
pub use settings::{keys, Namespace, SettingKey, SettingValue, SettingsStore};
pub use simulated::{DeviceProfile, SimulatedDevice};
pub use surfaces::{SettingsSurface, SurfaceLauncher};

/// All host seams the engines need, bundled for injection
#[derive(Clone)]
pub struct Host {
    pub info: HostInfo,
    pub settings: Arc<dyn SettingsStore>,
    pub display: Arc<dyn DisplaySurface>,
    pub broadcaster: Arc<dyn SystemBroadcaster>,
    pub surfaces: Arc<dyn SurfaceLauncher>,
    pub audio: Arc<dyn AudioControl>,
    pub packages: Arc<dyn PackageLauncher>,
}

impl Host {
    /// Wire every seam to the same simulated device
    pub fn simulated(device: Arc<SimulatedDevice>) -> Self {
        Self {
            info: device.host_info(),
            settings: device.clone(),
            display: device.clone(),
            broadcaster: device.clone(),
            surfaces: device.clone(),
            audio: device.clone(),
            packages: device,
        }
    }

    /// Builder: replace the settings store
    pub fn with_settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = settings;
        self
    }

    /// Builder: replace the display surface
    pub fn with_display(mut self, display: Arc<dyn DisplaySurface>) -> Self {
        self.display = display;
        self
    }

    /// Builder: replace the surface launcher
    pub fn with_surfaces(mut self, surfaces: Arc<dyn SurfaceLauncher>) -> Self {
        self.surfaces = surfaces;
        self
    }

    /// Builder: override the host info
    pub fn with_info(mut self, info: HostInfo) -> Self {
        self.info = info;
        self
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").field("info", &self.info).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_host_shares_device() {
        let device = Arc::new(SimulatedDevice::default());
        let host = Host::simulated(device.clone());
        host.settings
            .put(&keys::FONT_SCALE, SettingValue::Float(1.15))
            .unwrap();
        assert_eq!(device.setting(&keys::FONT_SCALE), Some(SettingValue::Float(1.15)));
        assert_eq!(host.info.sdk_level, 34);
    }

    #[test]
    fn test_with_info_overrides_platform() {
        let host = Host::simulated(Arc::new(SimulatedDevice::default()))
            .with_info(HostInfo::new(21, "x.y"));
        assert!(!host.info.has_write_settings_gate());
    }
}
