//! System settings store seam and well-known keys

use serde::{Deserialize, Serialize};

use devbridge_core::prelude::*;

/// Settings table a key lives in. Each table has its own write privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// User-writable once the write-settings grant is held
    System,
    /// Requires the secure-settings privilege
    Secure,
    /// Device-wide, requires the secure-settings privilege
    Global,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::System => write!(f, "system"),
            Namespace::Secure => write!(f, "secure"),
            Namespace::Global => write!(f, "global"),
        }
    }
}

/// A fully-qualified settings key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettingKey {
    pub namespace: Namespace,
    pub name: &'static str,
}

impl SettingKey {
    pub const fn system(name: &'static str) -> Self {
        Self {
            namespace: Namespace::System,
            name,
        }
    }

    pub const fn secure(name: &'static str) -> Self {
        Self {
            namespace: Namespace::Secure,
            name,
        }
    }

    pub const fn global(name: &'static str) -> Self {
        Self {
            namespace: Namespace::Global,
            name,
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Value stored under a settings key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Int(i32),
    Float(f32),
}

impl SettingValue {
    pub fn as_i32(self) -> i32 {
        match self {
            SettingValue::Int(v) => v,
            SettingValue::Float(v) => v.round() as i32,
        }
    }

    pub fn as_f32(self) -> f32 {
        match self {
            SettingValue::Int(v) => v as f32,
            SettingValue::Float(v) => v,
        }
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Well-known settings keys
pub mod keys {
    use super::SettingKey;

    pub const SCREEN_BRIGHTNESS: SettingKey = SettingKey::system("screen_brightness");
    pub const SCREEN_BRIGHTNESS_MODE: SettingKey = SettingKey::system("screen_brightness_mode");
    pub const FONT_SCALE: SettingKey = SettingKey::system("font_scale");
    pub const HAPTIC_FEEDBACK_INTENSITY: SettingKey =
        SettingKey::system("haptic_feedback_intensity");
    pub const CAMERA_FLASH_NOTIFICATION: SettingKey =
        SettingKey::system("camera_flash_notification");
    pub const SCREEN_FLASH_NOTIFICATION: SettingKey =
        SettingKey::system("screen_flash_notification");

    pub const HIGH_TEXT_CONTRAST_ENABLED: SettingKey =
        SettingKey::secure("high_text_contrast_enabled");
    pub const DISPLAY_INVERSION_ENABLED: SettingKey =
        SettingKey::secure("accessibility_display_inversion_enabled");
    pub const CAPTIONING_ENABLED: SettingKey =
        SettingKey::secure("accessibility_captioning_enabled");

    pub const WINDOW_ANIMATION_SCALE: SettingKey = SettingKey::global("window_animation_scale");
    pub const TRANSITION_ANIMATION_SCALE: SettingKey =
        SettingKey::global("transition_animation_scale");
    pub const ANIMATOR_DURATION_SCALE: SettingKey = SettingKey::global("animator_duration_scale");

    /// Brightness mode values
    pub const BRIGHTNESS_MODE_MANUAL: i32 = 0;
    pub const BRIGHTNESS_MODE_AUTOMATIC: i32 = 1;
}

/// Persistent system settings owned by the host.
///
/// The bridge never requests or revokes the write grant; it only reads
/// [`SettingsStore::can_write`] and branches on it.
pub trait SettingsStore: Send + Sync {
    /// Whether this process currently holds the write-settings grant
    fn can_write(&self) -> bool;

    /// Read a value; `Ok(None)` when the key has never been set
    fn get(&self, key: &SettingKey) -> Result<Option<SettingValue>>;

    /// Write a value
    fn put(&self, key: &SettingKey, value: SettingValue) -> Result<()>;

    /// Remove a value so the host default applies again. Same privilege as
    /// [`SettingsStore::put`].
    fn reset(&self, key: &SettingKey) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_key_display() {
        assert_eq!(keys::FONT_SCALE.to_string(), "system/font_scale");
        assert_eq!(
            keys::ANIMATOR_DURATION_SCALE.to_string(),
            "global/animator_duration_scale"
        );
    }

    #[test]
    fn test_setting_value_conversions() {
        assert_eq!(SettingValue::Float(1.6).as_i32(), 2);
        assert_eq!(SettingValue::Int(3).as_f32(), 3.0);
    }

    #[test]
    fn test_animation_keys_share_namespace() {
        assert_eq!(keys::WINDOW_ANIMATION_SCALE.namespace, Namespace::Global);
        assert_eq!(keys::TRANSITION_ANIMATION_SCALE.namespace, Namespace::Global);
        assert_eq!(keys::ANIMATOR_DURATION_SCALE.namespace, Namespace::Global);
    }
}
