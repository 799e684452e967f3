//! Foreground window inspection seam used by the accessibility service

use devbridge_core::ScreenNode;

/// Accessibility event categories the service subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessibilityEventType {
    WindowStateChanged,
    WindowContentChanged,
    Other(u32),
}

/// An event delivered by the host while the service is connected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityEvent {
    pub event_type: AccessibilityEventType,
    pub package_name: Option<String>,
}

/// Gives access to the active window's UI tree.
///
/// The returned snapshot is owned by the caller; nothing in it refers back
/// into host memory.
pub trait WindowInspector: Send + Sync {
    /// Root of the active window, or `None` if no window is inspectable
    fn active_window_root(&self) -> Option<ScreenNode>;
}
