//! In-memory simulated device
//!
//! Implements every host seam against plain in-memory state so the bridge can
//! run headless (and be tested) without a real device. Permission rules
//! mirror the host's: system keys need the write-settings grant, secure and
//! global keys need the secure-settings privilege.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use devbridge_core::prelude::*;
use devbridge_core::ScreenNode;

use crate::audio::{AudioControl, AudioStream};
use crate::display::{Broadcast, DisplaySurface, SystemBroadcaster, WindowBrightness};
use crate::inspector::WindowInspector;
use crate::packages::PackageLauncher;
use crate::platform::HostInfo;
use crate::settings::{keys, Namespace, SettingKey, SettingValue, SettingsStore};
use crate::surfaces::{SettingsSurface, SurfaceLauncher};

/// Static description of a simulated device (`[device]` in config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceProfile {
    #[serde(default = "default_sdk_level")]
    pub sdk_level: u32,

    #[serde(default = "default_package_name")]
    pub package_name: String,

    /// Whether the write-settings grant is held
    #[serde(default = "default_true")]
    pub write_settings_granted: bool,

    /// Whether the secure-settings privilege is held
    #[serde(default)]
    pub secure_settings_granted: bool,

    #[serde(default = "default_max_volume")]
    pub max_volume: i32,

    /// Upper limit the host silently enforces on stored brightness
    #[serde(default)]
    pub enforced_brightness_cap: Option<i32>,

    #[serde(default)]
    pub installed_packages: Vec<String>,

    /// Surface actions that fail to open
    #[serde(default)]
    pub unavailable_surfaces: Vec<String>,

    /// Whether this process has a visible window
    #[serde(default = "default_true")]
    pub display_reachable: bool,
}

fn default_sdk_level() -> u32 {
    34
}

fn default_package_name() -> String {
    "dev.devbridge".to_string()
}

fn default_max_volume() -> i32 {
    15
}

fn default_true() -> bool {
    true
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            sdk_level: default_sdk_level(),
            package_name: default_package_name(),
            write_settings_granted: true,
            secure_settings_granted: false,
            max_volume: default_max_volume(),
            enforced_brightness_cap: None,
            installed_packages: Vec::new(),
            unavailable_surfaces: Vec::new(),
            display_reachable: true,
        }
    }
}

impl DeviceProfile {
    pub fn host_info(&self) -> HostInfo {
        HostInfo::new(self.sdk_level, self.package_name.clone())
    }
}

/// Most recent broadcasts, surfaces and launches kept for inspection
pub const HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
struct DeviceState {
    profile: DeviceProfile,
    settings: HashMap<SettingKey, SettingValue>,
    window: WindowBrightness,
    broadcasts: VecDeque<Broadcast>,
    opened_surfaces: VecDeque<SettingsSurface>,
    launched: VecDeque<String>,
    volume: i32,
    screen: Option<ScreenNode>,
}

impl DeviceState {
    fn check_write(&self, key: &SettingKey) -> Result<()> {
        let allowed = match key.namespace {
            Namespace::System => self.profile.write_settings_granted,
            Namespace::Secure | Namespace::Global => self.profile.secure_settings_granted,
        };
        if allowed {
            Ok(())
        } else {
            Err(Error::permission_denied(format!(
                "writing {} requires a grant this process does not hold",
                key
            )))
        }
    }
}

/// Append to a bounded history, dropping the oldest entry when full
fn record<T>(log: &mut VecDeque<T>, item: T) {
    if log.len() == HISTORY_LIMIT {
        log.pop_front();
    }
    log.push_back(item);
}

/// Thread-safe in-memory device
#[derive(Debug)]
pub struct SimulatedDevice {
    state: Mutex<DeviceState>,
}

impl SimulatedDevice {
    pub fn new(profile: DeviceProfile) -> Self {
        let mut settings = HashMap::new();
        settings.insert(keys::SCREEN_BRIGHTNESS, SettingValue::Int(128));
        settings.insert(
            keys::SCREEN_BRIGHTNESS_MODE,
            SettingValue::Int(keys::BRIGHTNESS_MODE_AUTOMATIC),
        );
        settings.insert(keys::FONT_SCALE, SettingValue::Float(1.0));

        Self {
            state: Mutex::new(DeviceState {
                volume: profile.max_volume / 2,
                profile,
                settings,
                window: WindowBrightness::UseSystem,
                broadcasts: VecDeque::with_capacity(HISTORY_LIMIT),
                opened_surfaces: VecDeque::with_capacity(HISTORY_LIMIT),
                launched: VecDeque::with_capacity(HISTORY_LIMIT),
                screen: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn host_info(&self) -> HostInfo {
        self.state().profile.host_info()
    }

    // ─────────────────────────────────────────────────────────
    // Mutators (host-side events)
    // ─────────────────────────────────────────────────────────

    pub fn set_write_settings_granted(&self, granted: bool) {
        self.state().profile.write_settings_granted = granted;
    }

    pub fn set_secure_settings_granted(&self, granted: bool) {
        self.state().profile.secure_settings_granted = granted;
    }

    pub fn set_display_reachable(&self, reachable: bool) {
        self.state().profile.display_reachable = reachable;
    }

    pub fn set_screen(&self, root: Option<ScreenNode>) {
        self.state().screen = root;
    }

    pub fn install_package(&self, package: impl Into<String>) {
        self.state().profile.installed_packages.push(package.into());
    }

    // ─────────────────────────────────────────────────────────
    // Observers
    // ─────────────────────────────────────────────────────────

    pub fn setting(&self, key: &SettingKey) -> Option<SettingValue> {
        self.state().settings.get(key).copied()
    }

    pub fn window(&self) -> WindowBrightness {
        self.state().window
    }

    /// Recent broadcasts, oldest first
    pub fn broadcasts(&self) -> Vec<Broadcast> {
        self.state().broadcasts.iter().cloned().collect()
    }

    /// Recently opened surfaces, oldest first
    pub fn opened_surfaces(&self) -> Vec<SettingsSurface> {
        self.state().opened_surfaces.iter().cloned().collect()
    }

    /// Recent launches, oldest first
    pub fn launched(&self) -> Vec<String> {
        self.state().launched.iter().cloned().collect()
    }

    pub fn volume_index(&self) -> i32 {
        self.state().volume
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new(DeviceProfile::default())
    }
}

impl SettingsStore for SimulatedDevice {
    fn can_write(&self) -> bool {
        self.state().profile.write_settings_granted
    }

    fn get(&self, key: &SettingKey) -> Result<Option<SettingValue>> {
        Ok(self.state().settings.get(key).copied())
    }

    fn put(&self, key: &SettingKey, value: SettingValue) -> Result<()> {
        let mut state = self.state();
        state.check_write(key)?;

        let stored = match (key, state.profile.enforced_brightness_cap) {
            (k, Some(cap)) if *k == keys::SCREEN_BRIGHTNESS => {
                SettingValue::Int(value.as_i32().min(cap))
            }
            _ => value,
        };
        debug!("simulated write {} = {}", key, stored);
        state.settings.insert(*key, stored);
        Ok(())
    }

    fn reset(&self, key: &SettingKey) -> Result<()> {
        let mut state = self.state();
        state.check_write(key)?;
        debug!("simulated reset {}", key);
        state.settings.remove(key);
        Ok(())
    }
}

impl DisplaySurface for SimulatedDevice {
    fn window_brightness(&self) -> Result<WindowBrightness> {
        let state = self.state();
        if !state.profile.display_reachable {
            return Err(Error::unavailable("no visible window"));
        }
        Ok(state.window)
    }

    fn set_window_brightness(&self, brightness: WindowBrightness) -> Result<()> {
        let mut state = self.state();
        if !state.profile.display_reachable {
            return Err(Error::unavailable("no visible window"));
        }
        state.window = brightness;
        Ok(())
    }
}

impl SystemBroadcaster for SimulatedDevice {
    fn broadcast(&self, broadcast: &Broadcast) -> Result<()> {
        record(&mut self.state().broadcasts, broadcast.clone());
        Ok(())
    }
}

impl SurfaceLauncher for SimulatedDevice {
    fn open(&self, surface: &SettingsSurface) -> Result<()> {
        let mut state = self.state();
        let blocked = state
            .profile
            .unavailable_surfaces
            .iter()
            .any(|action| action == surface.action);
        if blocked {
            return Err(Error::unavailable(format!(
                "no activity handles {}",
                surface.action
            )));
        }
        debug!("simulated open {}", surface);
        record(&mut state.opened_surfaces, surface.clone());
        Ok(())
    }
}

impl AudioControl for SimulatedDevice {
    fn max_volume(&self, _stream: AudioStream) -> Result<i32> {
        Ok(self.state().profile.max_volume)
    }

    fn volume(&self, _stream: AudioStream) -> Result<i32> {
        Ok(self.state().volume)
    }

    fn set_volume(&self, _stream: AudioStream, index: i32, _show_ui: bool) -> Result<()> {
        let mut state = self.state();
        state.volume = index.clamp(0, state.profile.max_volume);
        Ok(())
    }
}

impl PackageLauncher for SimulatedDevice {
    fn is_installed(&self, package: &str) -> bool {
        self.state()
            .profile
            .installed_packages
            .iter()
            .any(|p| p == package)
    }

    fn launch(&self, package: &str) -> Result<()> {
        if !self.is_installed(package) {
            return Err(Error::not_found(package));
        }
        debug!("simulated launch {}", package);
        record(&mut self.state().launched, package.to_string());
        Ok(())
    }
}

impl WindowInspector for SimulatedDevice {
    fn active_window_root(&self) -> Option<ScreenNode> {
        self.state().screen.clone()
    }
}
