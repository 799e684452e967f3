//! Bridge error types with wire codes

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Bridge error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Host Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unavailable: {message}")]
    Unavailable { message: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Host call failed: {message}")]
    Transient { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Channel Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Method channel protocol error: {message}")]
    Protocol { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Short code sent across the method channel in place of the full error
    pub fn code(&self) -> &'static str {
        match self {
            Error::PermissionDenied { .. } => "PERMISSION_DENIED",
            Error::Unavailable { .. } => "UNAVAILABLE",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Error::Config { .. } | Error::ConfigNotFound { .. } | Error::ConfigInvalid { .. } => {
                "CONFIG_ERROR"
            }
            Error::Protocol { .. } | Error::Json(_) => "PROTOCOL_ERROR",
            Error::Transient { .. } | Error::Io(_) => "FAILED",
        }
    }

    /// Caller-facing message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            Error::PermissionDenied { message }
            | Error::Unavailable { message }
            | Error::Transient { message }
            | Error::InvalidArgument { message } => message.clone(),
            Error::NotFound { what } => format!("{} not found", what),
            other => other.to_string(),
        }
    }

    /// Whether a fallback ladder may absorb this error and try the next rung
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            Error::PermissionDenied { .. }
                | Error::Unavailable { .. }
                | Error::Transient { .. }
                | Error::Io(_)
        )
    }

    /// Check if this error should abort the binary at startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config { .. } | Error::ConfigNotFound { .. } | Error::ConfigInvalid { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
