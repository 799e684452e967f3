//! devbridge library
//!
//! Binary-side plumbing for the bridge: the headless NDJSON method channel
//! served against a simulated device.

pub mod headless;

pub use headless::runner::{run_headless, serve};
pub use headless::HeadlessSession;
