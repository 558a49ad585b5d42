// Accelhub - JSON-RPC 2.0 Protocol Types
//
// Minimal JSON-RPC 2.0 framing shared by the UDS server and client.
// Accel failures travel as application error codes with the failure kind
// in `error.data.kind`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accel::AccelError;

/// A JSON-RPC 2.0 request.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub params: Value,
    pub id: Value,
}

/// A JSON-RPC 2.0 success/error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// Standard JSON-RPC 2.0 error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// Application error codes, one per accel failure kind
pub const UNKNOWN_MODULE: i32 = -32010;
pub const UNKNOWN_OPCODE: i32 = -32011;
pub const UNSUPPORTED_OPERATION: i32 = -32012;
pub const DUPLICATE_KEY_NAME: i32 = -32013;
pub const INVALID_CIPHER: i32 = -32014;
pub const INVALID_TWEAK_MODE: i32 = -32015;
pub const INVALID_KEY_LENGTH: i32 = -32016;
pub const UNSUPPORTED_CIPHER: i32 = -32017;
pub const UNSUPPORTED_TWEAK_MODE: i32 = -32018;
pub const KEY_NOT_FOUND: i32 = -32019;
pub const INVALID_KEY_NAME: i32 = -32020;

fn accel_error_code(err: &AccelError) -> i32 {
    match err {
        AccelError::UnknownModule(_) => UNKNOWN_MODULE,
        AccelError::UnknownOpcode(_) => UNKNOWN_OPCODE,
        AccelError::UnsupportedOperation { .. } => UNSUPPORTED_OPERATION,
        AccelError::DuplicateKeyName(_) => DUPLICATE_KEY_NAME,
        AccelError::InvalidCipher(_) => INVALID_CIPHER,
        AccelError::InvalidTweakMode(_) => INVALID_TWEAK_MODE,
        AccelError::InvalidKeyLength(_) => INVALID_KEY_LENGTH,
        AccelError::UnsupportedCipher { .. } => UNSUPPORTED_CIPHER,
        AccelError::UnsupportedTweakMode { .. } => UNSUPPORTED_TWEAK_MODE,
        AccelError::KeyNotFound(_) => KEY_NOT_FOUND,
        AccelError::InvalidKeyName(_) => INVALID_KEY_NAME,
    }
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// The accel failure kind carried in `data`, if any.
    pub fn kind(&self) -> Option<&str> {
        self.data.as_ref()?.get("kind")?.as_str()
    }
}

impl From<&AccelError> for JsonRpcError {
    fn from(err: &AccelError) -> Self {
        Self {
            code: accel_error_code(err),
            message: err.to_string(),
            data: Some(serde_json::json!({ "kind": err.kind() })),
        }
    }
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: u64) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id: Value::from(id),
        }
    }

    /// Validate that this is a proper JSON-RPC 2.0 request.
    pub fn validate(&self) -> Result<(), String> {
        if self.jsonrpc != "2.0" {
            return Err("jsonrpc must be \"2.0\"".to_string());
        }
        if self.method.is_empty() {
            return Err("method must not be empty".to_string());
        }
        Ok(())
    }
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response from an error object.
    pub fn failure(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Create an error response.
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self::failure(id, JsonRpcError::new(code, message))
    }

    /// Create a parse error response (id is null because we couldn't parse it).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::error(Value::Null, PARSE_ERROR, message)
    }

    /// Split into the result value or the error object.
    pub fn into_result(self) -> Result<Value, JsonRpcError> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(error),
            (Some(result), None) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
