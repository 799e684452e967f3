//! # devbridge-core - Core Domain Types
//!
//! Foundation crate for devbridge. Provides the brightness and outcome types,
//! the screen tree snapshot, the method-channel wire types, error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`BrightnessRequest`] - User-facing percentage, clamped to 0..=100
//! - [`DeviceBrightnessLevel`] - Absolute device level, always in `[1, max]`
//! - [`FallbackOutcome`] - Applied / AppliedLocally / Failed
//!
//! ### Screen Tree (`screen_tree`)
//! - [`ScreenNode`] - Foreground UI node with text, description and children
//!
//! ### Method Channel (`channel`)
//! - [`MethodCall`] - Named operation with key/value arguments
//! - [`MethodResponse`] - Success, error(code, message) or not-implemented
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Error taxonomy with wire codes and fallback classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! ```rust
//! use devbridge_core::prelude::*;
//! ```

pub mod channel;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod screen_tree;
pub mod types;

pub use channel::{MethodCall, MethodResponse};
pub use error::{Error, Result, ResultExt};
pub use screen_tree::ScreenNode;
pub use types::{
    BrightnessRequest, DeviceBrightnessLevel, FallbackOutcome, DEFAULT_MAX_BRIGHTNESS,
};
