//! Process display surface and system broadcast seams

use devbridge_core::prelude::*;

/// Broadcast action announcing a system brightness change
pub const ACTION_SCREEN_BRIGHTNESS_CHANGED: &str = "android.intent.action.SCREEN_BRIGHTNESS_CHANGED";

/// Extra carrying the new absolute level
pub const EXTRA_BRIGHTNESS: &str = "brightness";

/// Raw sentinel meaning "follow the system brightness"
pub const USE_SYSTEM_BRIGHTNESS: f32 = -1.0;

/// Brightness override on this process's own window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowBrightness {
    /// No override; the window follows the system value
    UseSystem,
    /// Fixed override in `[0.0, 1.0]`
    Level(f32),
}

impl WindowBrightness {
    pub fn level(value: f32) -> Self {
        Self::Level(value.clamp(0.0, 1.0))
    }

    /// Value as the host stores it, with the `-1.0` sentinel for [`Self::UseSystem`]
    pub fn raw(self) -> f32 {
        match self {
            WindowBrightness::UseSystem => USE_SYSTEM_BRIGHTNESS,
            WindowBrightness::Level(v) => v,
        }
    }

    pub fn from_raw(raw: f32) -> Self {
        if raw < 0.0 {
            WindowBrightness::UseSystem
        } else {
            WindowBrightness::level(raw)
        }
    }
}

/// This process's own display window.
///
/// Only reachable while the process has a visible window; implementations
/// return [`Error::Unavailable`] otherwise.
pub trait DisplaySurface: Send + Sync {
    fn window_brightness(&self) -> Result<WindowBrightness>;

    fn set_window_brightness(&self, brightness: WindowBrightness) -> Result<()>;
}

/// A system-wide notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    pub action: String,
    pub extras: Vec<(String, i64)>,
}

impl Broadcast {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: Vec::new(),
        }
    }

    pub fn extra(mut self, key: impl Into<String>, value: i64) -> Self {
        self.extras.push((key.into(), value));
        self
    }

    pub fn get_extra(&self, key: &str) -> Option<i64> {
        self.extras
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }
}

/// Sends system-wide notifications
pub trait SystemBroadcaster: Send + Sync {
    fn broadcast(&self, broadcast: &Broadcast) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_brightness_raw_roundtrip_sentinel() {
        assert_eq!(WindowBrightness::UseSystem.raw(), -1.0);
        assert_eq!(WindowBrightness::from_raw(-1.0), WindowBrightness::UseSystem);
        assert_eq!(WindowBrightness::from_raw(0.5), WindowBrightness::Level(0.5));
    }

    #[test]
    fn test_window_brightness_level_clamps() {
        assert_eq!(WindowBrightness::level(1.7), WindowBrightness::Level(1.0));
    }

    #[test]
    fn test_broadcast_extras() {
        let b = Broadcast::new(ACTION_SCREEN_BRIGHTNESS_CHANGED).extra(EXTRA_BRIGHTNESS, 128);
        assert_eq!(b.get_extra(EXTRA_BRIGHTNESS), Some(128));
        assert_eq!(b.get_extra("missing"), None);
    }
}
