//! Method-channel wire types
//!
//! A call is a named operation plus a map of arguments. Every call gets
//! exactly one response: a success (with or without a value), an error with a
//! short code and a human-readable message, or "not implemented".
//!
//! On the wire each message is a single JSON object per line:
//!
//! ```json
//! {"id":1,"method":"setBrightness","arguments":{"brightness":75}}
//! {"id":1,"result":true}
//! {"id":2,"error":{"code":"PERMISSION_DENIED","message":"Cannot modify system settings"}}
//! {"id":3,"notImplemented":true}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// A named call received over the channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Opaque correlation id echoed back in the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub method: String,

    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            id: None,
            method: method.into(),
            arguments: Map::new(),
        }
    }

    /// Builder: attach an argument
    pub fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.to_string(), value.into());
        self
    }

    /// Builder: attach a correlation id
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Parse one line of channel input
    pub fn parse(line: &str) -> Result<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(Error::protocol("empty message"));
        }
        serde_json::from_str(trimmed).map_err(|e| Error::protocol(e.to_string()))
    }

    /// Integer argument; floats are rounded, numeric strings are accepted
    pub fn arg_i64(&self, key: &str) -> Option<i64> {
        match self.arguments.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Floating point argument
    pub fn arg_f64(&self, key: &str) -> Option<f64> {
        match self.arguments.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String argument
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

/// Response to a [`MethodCall`]
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Option<Value>),
    Error { code: String, message: String },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success(Some(value.into()))
    }

    pub fn success_empty() -> Self {
        Self::Success(None)
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Error response carrying the error's code and a caller-facing message.
    ///
    /// The internal error text is not forwarded.
    pub fn from_error(err: &Error, message: impl Into<String>) -> Self {
        Self::error(err.code(), message)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResponse::Success(_))
    }

    /// The success value, if any
    pub fn value(&self) -> Option<&Value> {
        match self {
            MethodResponse::Success(value) => value.as_ref(),
            _ => None,
        }
    }

    /// Error code, if this is an error response
    pub fn error_code(&self) -> Option<&str> {
        match self {
            MethodResponse::Error { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Build the JSON envelope for this response
    pub fn to_json(&self, id: Option<&Value>) -> Value {
        let id = id.cloned().unwrap_or(Value::Null);
        match self {
            MethodResponse::Success(Some(value)) => json!({ "id": id, "result": value }),
            MethodResponse::Success(None) => json!({ "id": id, "result": null }),
            MethodResponse::Error { code, message } => json!({
                "id": id,
                "error": { "code": code, "message": message },
            }),
            MethodResponse::NotImplemented => json!({ "id": id, "notImplemented": true }),
        }
    }

    /// Serialize to a single wire line (without trailing newline)
    pub fn encode(&self, id: Option<&Value>) -> String {
        self.to_json(id).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call_with_arguments() {
        let call =
            MethodCall::parse(r#"{"id":7,"method":"setVolume","arguments":{"level":40}}"#)
                .unwrap();
        assert_eq!(call.method, "setVolume");
        assert_eq!(call.id, Some(json!(7)));
        assert_eq!(call.arg_i64("level"), Some(40));
    }

    #[test]
    fn test_parse_call_without_arguments() {
        let call = MethodCall::parse(r#"{"method":"canWriteSettings"}"#).unwrap();
        assert!(call.arguments.is_empty());
        assert!(call.id.is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = MethodCall::parse("not json").unwrap_err();
        assert_eq!(err.code(), "PROTOCOL_ERROR");
        assert!(MethodCall::parse("   ").is_err());
    }

    #[test]
    fn test_argument_coercions() {
        let call = MethodCall::new("x")
            .arg("float", 2.6)
            .arg("text_num", "12")
            .arg("name", "large");
        assert_eq!(call.arg_i64("float"), Some(3));
        assert_eq!(call.arg_i64("text_num"), Some(12));
        assert_eq!(call.arg_f64("float"), Some(2.6));
        assert_eq!(call.arg_str("name"), Some("large"));
        assert_eq!(call.arg_i64("name"), None);
        assert_eq!(call.arg_i64("missing"), None);
    }

    #[test]
    fn test_encode_success_and_error() {
        let id = json!(3);
        assert_eq!(
            MethodResponse::success(true).encode(Some(&id)),
            r#"{"id":3,"result":true}"#
        );

        let line = MethodResponse::error("FAILED", "Cannot set volume").encode(Some(&id));
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["error"]["code"], "FAILED");
        assert_eq!(value["error"]["message"], "Cannot set volume");
    }

    #[test]
    fn test_encode_not_implemented_without_id() {
        let value = MethodResponse::NotImplemented.to_json(None);
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["notImplemented"], true);
    }

    #[test]
    fn test_from_error_hides_internal_text() {
        let err = Error::transient("binder transaction failed: DeadObjectException");
        let resp = MethodResponse::from_error(&err, "Cannot set volume");
        assert_eq!(resp.error_code(), Some("FAILED"));
        if let MethodResponse::Error { message, .. } = resp {
            assert!(!message.contains("binder"));
        }
    }
}
