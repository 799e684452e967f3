//! Headless mode - NDJSON method channel over stdin/stdout
//!
//! Each input line is one [`MethodCall`]; each call produces exactly one
//! response line. Blank lines are skipped. Input that does not parse yields a
//! `PROTOCOL_ERROR` response with a null id.
//!
//! # Example Session
//!
//! ```json
//! > {"id":1,"method":"canWriteSettings"}
//! < {"id":1,"result":true}
//! > {"id":2,"method":"setTextSize","arguments":{"size":"large"}}
//! < {"id":2,"result":true}
//! > {"id":3,"method":"rebootDevice"}
//! < {"id":3,"notImplemented":true}
//! ```
//!
//! The device behind the channel is a [`SimulatedDevice`] built from the
//! `[device]` section of the config file.

pub mod runner;

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use devbridge_app::accessibility::AccessibilityRegistry;
use devbridge_app::config::{load_screen_fixture, Settings};
use devbridge_app::Bridge;
use devbridge_core::logging::call_span;
use devbridge_core::prelude::*;
use devbridge_core::{MethodCall, MethodResponse};
use devbridge_host::{Host, SimulatedDevice};

/// Caller-facing message for input that is not a method call
pub(crate) const MALFORMED_CALL: &str = "Malformed method call";

/// A bridge wired to a simulated device
#[derive(Debug)]
pub struct HeadlessSession {
    bridge: Bridge,
    device: Arc<SimulatedDevice>,
}

impl HeadlessSession {
    /// Build a session from settings, connecting accessibility through the
    /// process-wide registry. Relative fixture paths resolve against `base`.
    pub fn from_settings(settings: &Settings, base: &Path) -> Result<Self> {
        Self::with_registry(settings, base, devbridge_app::registry())
    }

    /// Build a session that reads the screen through `registry`
    pub fn with_registry(
        settings: &Settings,
        base: &Path,
        registry: &'static AccessibilityRegistry,
    ) -> Result<Self> {
        let curve = settings.brightness.build_curve()?;
        let device = Arc::new(SimulatedDevice::new(settings.device.clone()));

        if let Some(fixture) = &settings.accessibility.screen_fixture {
            let root = load_screen_fixture(base, fixture)?;
            debug!("Loaded screen fixture with {} nodes", root.node_count());
            device.set_screen(Some(root));
        }

        let bridge = Bridge::new(Host::simulated(device.clone()), curve).with_registry(registry);

        if settings.accessibility.enabled {
            registry.on_service_connected(device.clone());
        }

        info!(
            "Headless session ready (API level {}, {} curve)",
            settings.device.sdk_level,
            settings.brightness.curve_name()
        );
        Ok(Self { bridge, device })
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn device(&self) -> &Arc<SimulatedDevice> {
        &self.device
    }

    /// Process one input line, returning the response line to write.
    ///
    /// Returns `None` for blank lines.
    pub fn process_line(&self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return None;
        }

        let encoded = match MethodCall::parse(line) {
            Ok(call) => {
                let _span = call_span(&call.method, call.id.as_ref()).entered();
                let response = self.bridge.handle(&call);
                response.encode(call.id.as_ref())
            }
            Err(e) => {
                warn!("Rejected channel input: {}", e);
                MethodResponse::from_error(&e, MALFORMED_CALL).encode(None)
            }
        };
        Some(encoded)
    }

    /// Execute a single call given a method name and optional JSON object of
    /// arguments
    pub fn call(&self, method: &str, arguments: Option<&str>) -> Result<String> {
        let arguments: Map<String, Value> = match arguments {
            Some(raw) => match serde_json::from_str::<Value>(raw)? {
                Value::Object(map) => map,
                other => {
                    return Err(Error::invalid_argument(format!(
                        "arguments must be a JSON object, got {}",
                        other
                    )))
                }
            },
            None => Map::new(),
        };

        let call = MethodCall {
            id: None,
            method: method.to_string(),
            arguments,
        };
        let _span = call_span(&call.method, None).entered();
        Ok(self.bridge.handle(&call).encode(None))
    }
}
