//! Brightness controller
//!
//! Converts a user percentage into a device level through the configured
//! [`BrightnessCurve`], then climbs a two-rung ladder:
//!
//! 1. [`BrightnessPath::SystemSetting`] - durable write of the system
//!    brightness, only on hosts with the runtime write gate and while the
//!    grant is held
//! 2. [`BrightnessPath::WindowOverride`] - this process's own window only
//!
//! [`BrightnessController::apply_brightness`] never returns an error. It only
//! reports [`FallbackOutcome::Failed`] when the window is unreachable too.

pub mod curve;

pub use curve::{BrightnessCurve, Breakpoint, CalibrationTable, DEFAULT_GAMMA};

use devbridge_core::prelude::*;
use devbridge_core::{BrightnessRequest, DeviceBrightnessLevel, FallbackOutcome};
use devbridge_host::display::{ACTION_SCREEN_BRIGHTNESS_CHANGED, EXTRA_BRIGHTNESS};
use devbridge_host::{keys, Broadcast, Host, SettingValue, WindowBrightness};

use crate::ladder::FallbackLadder;

/// Which rung applied the brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrightnessPath {
    SystemSetting,
    WindowOverride,
}

/// Outcome of a brightness change with the level that was targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessReport {
    pub outcome: FallbackOutcome,
    pub level: DeviceBrightnessLevel,
    pub path: Option<BrightnessPath>,
}

#[derive(Debug, Clone)]
pub struct BrightnessController {
    host: Host,
    curve: BrightnessCurve,
}

impl BrightnessController {
    pub fn new(host: Host, curve: BrightnessCurve) -> Self {
        Self { host, curve }
    }

    pub fn curve(&self) -> &BrightnessCurve {
        &self.curve
    }

    /// Apply `percent` (clamped to 0..=100) and return the outcome
    pub fn apply_brightness(&self, percent: i64) -> FallbackOutcome {
        self.apply(percent).outcome
    }

    /// Apply `percent` and report the level and path taken
    pub fn apply(&self, percent: i64) -> BrightnessReport {
        let request = BrightnessRequest::new(percent);
        let level = self.curve.level(request);
        debug!(
            "Brightness {}% -> {} ({} curve)",
            request.percent(),
            level,
            self.curve.name()
        );

        let result = FallbackLadder::new("brightness")
            .rung(BrightnessPath::SystemSetting, || {
                self.write_system_brightness(level)
            })
            .rung(BrightnessPath::WindowOverride, || {
                self.override_window(level)
            })
            .climb();

        BrightnessReport {
            outcome: result.outcome,
            level,
            path: result.path,
        }
    }

    fn write_system_brightness(&self, level: DeviceBrightnessLevel) -> Result<FallbackOutcome> {
        if !self.host.info.has_write_settings_gate() {
            debug!(
                "API level {} predates the write-settings gate, using window brightness",
                self.host.info.sdk_level
            );
            return Ok(FallbackOutcome::Failed);
        }
        if !self.host.settings.can_write() {
            warn!("No write-settings permission, using window brightness");
            return Ok(FallbackOutcome::Failed);
        }

        let settings = &self.host.settings;
        settings.put(
            &keys::SCREEN_BRIGHTNESS_MODE,
            SettingValue::Int(keys::BRIGHTNESS_MODE_MANUAL),
        )?;
        let target = i32::from(level.value());
        settings.put(&keys::SCREEN_BRIGHTNESS, SettingValue::Int(target))?;

        match settings.get(&keys::SCREEN_BRIGHTNESS)? {
            Some(actual) if actual.as_i32() == target => {}
            Some(actual) => warn!(
                "Brightness read back as {} after writing {}, host may be enforcing a limit",
                actual, target
            ),
            None => warn!("Brightness missing after writing {}", target),
        }

        let notice = Broadcast::new(ACTION_SCREEN_BRIGHTNESS_CHANGED)
            .extra(EXTRA_BRIGHTNESS, i64::from(target));
        if let Err(e) = self.host.broadcaster.broadcast(&notice) {
            warn!("Failed to announce brightness change: {}", e);
        }

        if let Err(e) = self
            .host
            .display
            .set_window_brightness(WindowBrightness::UseSystem)
        {
            warn!("Failed to reset window brightness to system value: {}", e);
        }

        info!(
            "System brightness set to {} (~{}%)",
            level,
            level.approx_percent()
        );
        Ok(FallbackOutcome::Applied)
    }

    fn override_window(&self, level: DeviceBrightnessLevel) -> Result<FallbackOutcome> {
        self.host
            .display
            .set_window_brightness(WindowBrightness::level(level.normalized()))?;
        info!("Window brightness set to {}", level);
        Ok(FallbackOutcome::AppliedLocally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devbridge_host::test_utils::{denied_device, granted_device};
    use devbridge_host::{DeviceProfile, DisplaySurface, HostInfo, SettingsStore, SimulatedDevice};
    use mockall::mock;
    use std::sync::Arc;

    mock! {
        Store {}
        impl SettingsStore for Store {
            fn can_write(&self) -> bool;
            fn get(&self, key: &devbridge_host::SettingKey) -> Result<Option<SettingValue>>;
            fn put(&self, key: &devbridge_host::SettingKey, value: SettingValue) -> Result<()>;
            fn reset(&self, key: &devbridge_host::SettingKey) -> Result<()>;
        }
    }

    fn controller(device: &Arc<SimulatedDevice>) -> BrightnessController {
        BrightnessController::new(Host::simulated(device.clone()), BrightnessCurve::default())
    }

    #[test]
    fn test_granted_write_is_applied() {
        let device = granted_device();
        let outcome = controller(&device).apply_brightness(75);

        assert_eq!(outcome, FallbackOutcome::Applied);
        assert_eq!(device.setting(&keys::SCREEN_BRIGHTNESS), Some(SettingValue::Int(135)));
        assert_eq!(
            device.setting(&keys::SCREEN_BRIGHTNESS_MODE),
            Some(SettingValue::Int(keys::BRIGHTNESS_MODE_MANUAL))
        );
    }

    #[test]
    fn test_granted_write_resets_window_to_system() {
        let device = granted_device();
        device
            .set_window_brightness(WindowBrightness::Level(0.2))
            .unwrap();

        controller(&device).apply_brightness(40);

        assert_eq!(device.window(), WindowBrightness::UseSystem);
    }

    #[test]
    fn test_granted_write_broadcasts_level() {
        let device = granted_device();
        let report = controller(&device).apply(100);

        let broadcasts = device.broadcasts();
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].action, ACTION_SCREEN_BRIGHTNESS_CHANGED);
        assert_eq!(broadcasts[0].get_extra(EXTRA_BRIGHTNESS), Some(255));
        assert_eq!(report.path, Some(BrightnessPath::SystemSetting));
    }

    #[test]
    fn test_denied_uses_window_and_leaves_system_untouched() {
        let device = denied_device();
        let ctrl = controller(&device);
        let expected = ctrl.curve().level(BrightnessRequest::new(75));

        let report = ctrl.apply(75);

        assert_eq!(report.outcome, FallbackOutcome::AppliedLocally);
        assert_eq!(report.path, Some(BrightnessPath::WindowOverride));
        assert_eq!(device.window(), WindowBrightness::Level(expected.normalized()));
        assert_eq!(device.setting(&keys::SCREEN_BRIGHTNESS), Some(SettingValue::Int(128)));
        assert_eq!(
            device.setting(&keys::SCREEN_BRIGHTNESS_MODE),
            Some(SettingValue::Int(keys::BRIGHTNESS_MODE_AUTOMATIC))
        );
        assert!(device.broadcasts().is_empty());
    }

    #[test]
    fn test_pre_gate_host_uses_window() {
        let device = Arc::new(SimulatedDevice::new(DeviceProfile {
            sdk_level: 22,
            ..Default::default()
        }));
        let outcome = controller(&device).apply_brightness(50);

        assert_eq!(outcome, FallbackOutcome::AppliedLocally);
        assert_eq!(device.setting(&keys::SCREEN_BRIGHTNESS), Some(SettingValue::Int(128)));
    }

    #[test]
    fn test_unreachable_display_fails() {
        let device = denied_device();
        device.set_display_reachable(false);

        assert_eq!(controller(&device).apply_brightness(50), FallbackOutcome::Failed);
    }

    #[test]
    fn test_zero_percent_stays_visible() {
        let device = denied_device();
        let report = controller(&device).apply(0);

        assert_eq!(report.level.value(), 1);
        match device.window() {
            WindowBrightness::Level(v) => assert!(v > 0.0),
            other => panic!("expected window level, got {:?}", other),
        }
    }

    #[test]
    fn test_read_back_mismatch_still_applied() {
        let device = Arc::new(SimulatedDevice::new(DeviceProfile {
            enforced_brightness_cap: Some(100),
            ..Default::default()
        }));
        let outcome = controller(&device).apply_brightness(100);

        assert_eq!(outcome, FallbackOutcome::Applied);
        assert_eq!(device.setting(&keys::SCREEN_BRIGHTNESS), Some(SettingValue::Int(100)));
    }

    #[test]
    fn test_write_error_falls_back_to_window() {
        let device = granted_device();
        let mut store = MockStore::new();
        store.expect_can_write().return_const(true);
        store
            .expect_put()
            .returning(|_, _| Err(Error::transient("settings provider crashed")));
        store.expect_get().never();

        let host = Host::simulated(device.clone()).with_settings(Arc::new(store));
        let ctrl = BrightnessController::new(host, BrightnessCurve::default());

        assert_eq!(ctrl.apply_brightness(60), FallbackOutcome::AppliedLocally);
        assert!(matches!(device.window(), WindowBrightness::Level(_)));
        assert!(device.broadcasts().is_empty());
    }

    #[test]
    fn test_calibrated_curve_drives_level() {
        let device = granted_device();
        let ctrl = BrightnessController::new(
            Host::simulated(device.clone()).with_info(HostInfo::new(30, "dev.devbridge")),
            BrightnessCurve::calibrated(CalibrationTable::default()),
        );

        ctrl.apply_brightness(50);

        assert_eq!(device.setting(&keys::SCREEN_BRIGHTNESS), Some(SettingValue::Int(52)));
    }
}
