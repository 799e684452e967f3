//! Accessibility service registry and screen reader
//!
//! The host drives the service lifecycle through the `on_*` callbacks. The
//! registry holds the single live service behind a lock so readers always
//! see either a fully connected service or none at all.
//!
//! ```text
//! Unregistered --connect--> Connected --destroy--> Destroyed
//!                               ^                      |
//!                               +-------connect--------+
//! ```

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use devbridge_core::prelude::*;
use devbridge_core::ScreenNode;
use devbridge_host::{AccessibilityEvent, AccessibilityEventType, WindowInspector};

/// Separator placed between extracted text segments
pub const SEGMENT_SEPARATOR: &str = ". ";

/// Message when the active window exposes no root node
pub const NO_SCREEN_CONTENT: &str = "Unable to access screen content";

/// Message when the service has not been connected by the host
pub const SERVICE_NOT_ENABLED: &str = "Accessibility service not enabled";

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Generic,
}

/// Capabilities the service advertises to the host on connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub event_types: Vec<AccessibilityEventType>,
    pub feedback_type: FeedbackType,
    pub retrieve_interactive_windows: bool,
    pub notification_timeout: Duration,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            event_types: vec![
                AccessibilityEventType::WindowStateChanged,
                AccessibilityEventType::WindowContentChanged,
            ],
            feedback_type: FeedbackType::Generic,
            retrieve_interactive_windows: true,
            notification_timeout: Duration::from_millis(100),
        }
    }
}

impl ServiceInfo {
    pub fn subscribes_to(&self, event_type: AccessibilityEventType) -> bool {
        self.event_types.contains(&event_type)
    }
}

/// A connected accessibility service
pub struct AccessibilityService {
    inspector: Arc<dyn WindowInspector>,
    info: ServiceInfo,
}

impl AccessibilityService {
    pub fn new(inspector: Arc<dyn WindowInspector>) -> Self {
        Self {
            inspector,
            info: ServiceInfo::default(),
        }
    }

    pub fn info(&self) -> &ServiceInfo {
        &self.info
    }

    /// Text of the active window, or [`Error::Unavailable`] if it has no root
    pub fn read_current_screen(&self) -> Result<String> {
        let root = self
            .inspector
            .active_window_root()
            .ok_or_else(|| Error::unavailable(NO_SCREEN_CONTENT))?;
        Ok(extract_text(&root))
    }
}

impl std::fmt::Debug for AccessibilityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessibilityService")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Collect non-blank text and descriptions in pre-order.
///
/// At each node the text comes before the description, and both before the
/// children. Segments are joined with [`SEGMENT_SEPARATOR`].
pub fn extract_text(root: &ScreenNode) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let mut pending = vec![root];

    while let Some(node) = pending.pop() {
        segments.extend(node.readable_text());
        segments.extend(node.readable_description());
        pending.extend(node.children.iter().rev());
    }

    segments.join(SEGMENT_SEPARATOR).trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state of the process-wide service
#[derive(Debug, Clone, Default)]
pub enum ServiceState {
    #[default]
    Unregistered,
    Connected(Arc<AccessibilityService>),
    Destroyed,
}

impl ServiceState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ServiceState::Connected(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServiceState::Unregistered => "unregistered",
            ServiceState::Connected(_) => "connected",
            ServiceState::Destroyed => "destroyed",
        }
    }
}

/// Holder for at most one live [`AccessibilityService`]
#[derive(Debug)]
pub struct AccessibilityRegistry {
    state: RwLock<ServiceState>,
}

impl AccessibilityRegistry {
    pub const fn new() -> Self {
        Self {
            state: RwLock::new(ServiceState::Unregistered),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ServiceState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ServiceState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Host connected the service; replaces any previous instance
    pub fn on_service_connected(
        &self,
        inspector: Arc<dyn WindowInspector>,
    ) -> Arc<AccessibilityService> {
        let service = Arc::new(AccessibilityService::new(inspector));
        let previous = std::mem::replace(
            &mut *self.write(),
            ServiceState::Connected(service.clone()),
        );
        if previous.is_connected() {
            warn!("Accessibility service reconnected without a destroy, replacing instance");
        }
        info!(
            "Accessibility service connected ({} event types, timeout {:?})",
            service.info().event_types.len(),
            service.info().notification_timeout
        );
        service
    }

    pub fn on_accessibility_event(&self, event: &AccessibilityEvent) {
        match &*self.read() {
            ServiceState::Connected(service) if service.info().subscribes_to(event.event_type) => {
                debug!(
                    "Accessibility event {:?} from {}",
                    event.event_type,
                    event.package_name.as_deref().unwrap_or("<unknown>")
                );
            }
            ServiceState::Connected(_) => {
                trace!("Ignoring unsubscribed event {:?}", event.event_type);
            }
            state => {
                debug!("Dropping accessibility event while {}", state.name());
            }
        }
    }

    pub fn on_interrupt(&self) {
        info!("Accessibility service interrupted");
    }

    /// Host tore the service down
    pub fn on_destroy(&self) {
        let previous = std::mem::replace(&mut *self.write(), ServiceState::Destroyed);
        if previous.is_connected() {
            info!("Accessibility service destroyed");
        } else {
            debug!("Destroy received while {}", previous.name());
        }
    }

    /// Immutable snapshot of the current state
    pub fn snapshot(&self) -> ServiceState {
        self.read().clone()
    }

    /// The connected service, if any
    pub fn service(&self) -> Option<Arc<AccessibilityService>> {
        match &*self.read() {
            ServiceState::Connected(service) => Some(service.clone()),
            _ => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.read().is_connected()
    }

    /// Read the foreground screen through the connected service.
    ///
    /// Fails with [`Error::Unavailable`] unless the service is connected.
    pub fn read_screen(&self) -> Result<String> {
        let service = self
            .service()
            .ok_or_else(|| Error::unavailable(SERVICE_NOT_ENABLED))?;
        service.read_current_screen()
    }
}

impl Default for AccessibilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: AccessibilityRegistry = AccessibilityRegistry::new();

/// The process-wide registry the host callbacks target
pub fn registry() -> &'static AccessibilityRegistry {
    &REGISTRY
}
