//! Settings surfaces: host screens the user can be sent to when a change
//! cannot be made programmatically.

use devbridge_core::prelude::*;

pub const ACTION_SETTINGS: &str = "android.settings.SETTINGS";
pub const ACTION_ACCESSIBILITY_SETTINGS: &str = "android.settings.ACCESSIBILITY_SETTINGS";
pub const ACTION_DISPLAY_SETTINGS: &str = "android.settings.DISPLAY_SETTINGS";
pub const ACTION_CAPTIONING_SETTINGS: &str = "android.settings.CAPTIONING_SETTINGS";
pub const ACTION_DEVELOPMENT_SETTINGS: &str = "android.settings.APPLICATION_DEVELOPMENT_SETTINGS";
pub const ACTION_SOUND_SETTINGS: &str = "android.settings.SOUND_SETTINGS";
pub const ACTION_VOICE_INPUT_SETTINGS: &str = "android.settings.VOICE_INPUT_SETTINGS";
pub const ACTION_INPUT_METHOD_SETTINGS: &str = "android.settings.INPUT_METHOD_SETTINGS";
pub const ACTION_ONE_HANDED_SETTINGS: &str = "android.settings.action.ONE_HANDED_SETTINGS";
pub const ACTION_MANAGE_WRITE_SETTINGS: &str = "android.settings.action.MANAGE_WRITE_SETTINGS";

/// A host settings screen, addressed by action and optional data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSurface {
    pub action: &'static str,
    pub data: Option<String>,
}

impl SettingsSurface {
    pub const fn new(action: &'static str) -> Self {
        Self { action, data: None }
    }

    /// The write-settings grant screen for `package`
    pub fn manage_write_settings(package: &str) -> Self {
        Self {
            action: ACTION_MANAGE_WRITE_SETTINGS,
            data: Some(format!("package:{}", package)),
        }
    }
}

impl std::fmt::Display for SettingsSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.data {
            Some(data) => write!(f, "{} ({})", self.action, data),
            None => write!(f, "{}", self.action),
        }
    }
}

pub const SETTINGS: SettingsSurface = SettingsSurface::new(ACTION_SETTINGS);
pub const ACCESSIBILITY: SettingsSurface = SettingsSurface::new(ACTION_ACCESSIBILITY_SETTINGS);
pub const DISPLAY: SettingsSurface = SettingsSurface::new(ACTION_DISPLAY_SETTINGS);
pub const CAPTIONING: SettingsSurface = SettingsSurface::new(ACTION_CAPTIONING_SETTINGS);
pub const DEVELOPMENT: SettingsSurface = SettingsSurface::new(ACTION_DEVELOPMENT_SETTINGS);
pub const SOUND: SettingsSurface = SettingsSurface::new(ACTION_SOUND_SETTINGS);
pub const VOICE_INPUT: SettingsSurface = SettingsSurface::new(ACTION_VOICE_INPUT_SETTINGS);
pub const INPUT_METHOD: SettingsSurface = SettingsSurface::new(ACTION_INPUT_METHOD_SETTINGS);
pub const ONE_HANDED: SettingsSurface = SettingsSurface::new(ACTION_ONE_HANDED_SETTINGS);

/// Opens settings surfaces on behalf of the user.
///
/// Returns [`Error::Unavailable`] when the host has no screen for the action.
pub trait SurfaceLauncher: Send + Sync {
    fn open(&self, surface: &SettingsSurface) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manage_write_settings_targets_package() {
        let surface = SettingsSurface::manage_write_settings("dev.devbridge");
        assert_eq!(surface.action, ACTION_MANAGE_WRITE_SETTINGS);
        assert_eq!(surface.data.as_deref(), Some("package:dev.devbridge"));
        assert!(surface.to_string().contains("package:dev.devbridge"));
    }

    #[test]
    fn test_const_surfaces_have_no_data() {
        assert!(ACCESSIBILITY.data.is_none());
        assert_eq!(ONE_HANDED.to_string(), ACTION_ONE_HANDED_SETTINGS);
    }
}
