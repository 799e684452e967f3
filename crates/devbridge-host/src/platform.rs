//! Host platform descriptor
//!
//! Feature gates are expressed as minimum host API levels. Callers branch on
//! [`HostInfo`] rather than probing the host at call time.

use serde::{Deserialize, Serialize};

/// API level that introduced runtime-gated system settings writes
pub const SDK_WRITE_SETTINGS_GATE: u32 = 23;

/// API level that introduced system captioning preferences
pub const SDK_CAPTIONING: u32 = 19;

/// API level that introduced the high-contrast text setting
pub const SDK_HIGH_TEXT_CONTRAST: u32 = 21;

/// API level that introduced camera/screen flash notifications
pub const SDK_FLASH_NOTIFICATIONS: u32 = 34;

/// Static facts about the host the bridge runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    /// Host API level
    pub sdk_level: u32,

    /// This process's own package name, used to address permission screens
    pub package_name: String,
}

impl HostInfo {
    pub fn new(sdk_level: u32, package_name: impl Into<String>) -> Self {
        Self {
            sdk_level,
            package_name: package_name.into(),
        }
    }

    /// Whether system settings writes are gated behind a runtime grant
    pub fn has_write_settings_gate(&self) -> bool {
        self.sdk_level >= SDK_WRITE_SETTINGS_GATE
    }

    /// Whether the host is at least `min_sdk`
    pub fn supports(&self, min_sdk: u32) -> bool {
        self.sdk_level >= min_sdk
    }

    /// User-facing message when `feature` needs a newer host
    pub fn unsupported_message(&self, feature: &str, min_sdk: u32) -> Option<String> {
        if self.supports(min_sdk) {
            None
        } else {
            Some(format!(
                "{} requires API level {} (this device runs {})",
                feature, min_sdk, self.sdk_level
            ))
        }
    }
}

impl Default for HostInfo {
    fn default() -> Self {
        Self::new(34, "dev.devbridge")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_info_default() {
        let info = HostInfo::default();
        assert_eq!(info.sdk_level, 34);
        assert!(info.has_write_settings_gate());
    }

    #[test]
    fn test_write_settings_gate_boundary() {
        assert!(!HostInfo::new(22, "a.b").has_write_settings_gate());
        assert!(HostInfo::new(23, "a.b").has_write_settings_gate());
    }

    #[test]
    fn test_unsupported_message() {
        let info = HostInfo::new(19, "a.b");
        let msg = info
            .unsupported_message("High contrast text", SDK_HIGH_TEXT_CONTRAST)
            .unwrap();
        assert!(msg.contains("21"));
        assert!(msg.contains("19"));
        assert!(info
            .unsupported_message("Captions", SDK_CAPTIONING)
            .is_none());
    }
}
