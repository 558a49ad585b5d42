// Accelhub - Request Dispatcher
//
// Maps JSON-RPC method names onto `AccelService` operations. Deprecated
// method names are rewritten through an alias table before lookup; the
// first use of each alias logs a deprecation warning.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::accel::AccelService;

use super::params::{AssignOpcParams, CryptoKeyCreateParams, CryptoKeysGetParams};
use super::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, METHOD_NOT_FOUND,
};

pub const GET_OPC_ASSIGNMENTS: &str = "accel_get_opc_assignments";
pub const GET_MODULE_INFO: &str = "accel_get_module_info";
pub const ASSIGN_OPC: &str = "accel_assign_opc";
pub const CRYPTO_KEY_CREATE: &str = "accel_crypto_key_create";
pub const CRYPTO_KEYS_GET: &str = "accel_crypto_keys_get";

/// Deprecated method name -> current method name.
pub const DEPRECATED_ALIASES: &[(&str, &str)] = &[("accel_get_engine_info", GET_MODULE_INFO)];

/// Current name for a deprecated method, if `method` is one.
pub fn deprecated_alias(method: &str) -> Option<(&'static str, &'static str)> {
    DEPRECATED_ALIASES
        .iter()
        .copied()
        .find(|(old, _)| *old == method)
}

pub struct Dispatcher {
    service: Arc<AccelService>,
    warned: Mutex<HashSet<&'static str>>,
}

impl Dispatcher {
    pub fn new(service: Arc<AccelService>) -> Self {
        Self {
            service,
            warned: Mutex::new(HashSet::new()),
        }
    }

    pub fn service(&self) -> &AccelService {
        &self.service
    }

    /// Rewrite deprecated names, warning once per alias. The flag is true
    /// only on the call that logged the warning.
    fn resolve_method<'a>(&self, method: &'a str) -> (&'a str, bool) {
        let Some((old, new)) = deprecated_alias(method) else {
            return (method, false);
        };

        let first_use = self
            .warned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(old);
        if first_use {
            tracing::warn!(
                deprecated = old,
                replacement = new,
                "RPC method '{}' is deprecated, use '{}' instead",
                old,
                new
            );
        }
        (new, first_use)
    }

    /// Run one method with its params.
    pub fn call(&self, method: &str, params: Value) -> Result<Value, JsonRpcError> {
        match self.resolve_method(method).0 {
            GET_OPC_ASSIGNMENTS => {
                expect_no_params(method, &params)?;
                to_result(&self.service.get_opc_assignments())
            }
            GET_MODULE_INFO => {
                expect_no_params(method, &params)?;
                to_result(&self.service.get_module_info())
            }
            ASSIGN_OPC => {
                let p: AssignOpcParams = parse_params(params)?;
                self.service
                    .assign_opc(&p.opname, &p.module)
                    .map_err(|e| JsonRpcError::from(&e))?;
                Ok(Value::Bool(true))
            }
            CRYPTO_KEY_CREATE => {
                let p: CryptoKeyCreateParams = parse_params(params)?;
                let decoded = p
                    .decode()
                    .map_err(|e| JsonRpcError::new(INVALID_PARAMS, e))?;
                self.service
                    .crypto_key_create(p.as_new_key(&decoded))
                    .map_err(|e| JsonRpcError::from(&e))?;
                Ok(Value::Bool(true))
            }
            CRYPTO_KEYS_GET => {
                let p: CryptoKeysGetParams = parse_params(params)?;
                let keys = self
                    .service
                    .crypto_keys_get(p.key_name.as_deref())
                    .map_err(|e| JsonRpcError::from(&e))?;
                to_result(&keys)
            }
            _ => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Unknown method: {}", method),
            )),
        }
    }

    /// Parse, validate and dispatch one raw request line.
    pub fn handle(&self, raw: &[u8], actor: &str) -> JsonRpcResponse {
        let value: Value = match serde_json::from_slice(raw) {
            Ok(value) => value,
            Err(e) => return JsonRpcResponse::parse_error(format!("Parse error: {}", e)),
        };

        // Well-formed JSON of the wrong shape is an invalid request.
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                )
            }
        };

        if let Err(e) = request.validate() {
            return JsonRpcResponse::error(request.id, INVALID_REQUEST, e);
        }

        tracing::debug!(method = %request.method, actor, "Dispatching request");

        match self.call(&request.method, request.params) {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => {
                tracing::info!(
                    method = %request.method,
                    actor,
                    code = error.code,
                    "Request failed: {}",
                    error.message
                );
                JsonRpcResponse::failure(request.id, error)
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn expect_no_params(method: &str, params: &Value) -> Result<(), JsonRpcError> {
    match params {
        Value::Null => Ok(()),
        Value::Object(map) if map.is_empty() => Ok(()),
        _ => Err(JsonRpcError::new(
            INVALID_PARAMS,
            format!("{} takes no parameters", method),
        )),
    }
}

/// Missing params deserialize like an empty object.
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, JsonRpcError> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value)
        .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, format!("Serialization error: {}", e)))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accel::{Module, ModuleRegistry, Opcode};
    use crate::gateway::protocol::{DUPLICATE_KEY_NAME, KEY_NOT_FOUND, UNKNOWN_MODULE};
    use crate::keys::REDACTED;

    const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f";

    fn dispatcher() -> Dispatcher {
        let registry = ModuleRegistry::with_modules([
            Module::new("mlx5", [Opcode::Encrypt, Opcode::Decrypt]),
            Module::new("mlx5_partial", [Opcode::Decrypt]),
        ])
        .unwrap();
        Dispatcher::new(Arc::new(AccelService::new(registry)))
    }

    fn request(method: &str, params: Value) -> Vec<u8> {
        serde_json::to_vec(&JsonRpcRequest::new(method, params, 1)).unwrap()
    }

    #[test]
    fn test_get_opc_assignments() {
        let d = dispatcher();
        let resp = d.handle(&request(GET_OPC_ASSIGNMENTS, Value::Null), "test");
        let result = resp.result.unwrap();
        let obj = result.as_object().unwrap();
        assert_eq!(obj.len(), Opcode::ALL.len());
        assert_eq!(obj["encrypt"], "software");
    }

    #[test]
    fn test_get_module_info() {
        let d = dispatcher();
        let resp = d.handle(&request(GET_MODULE_INFO, Value::Null), "test");
        let result = resp.result.unwrap();
        let modules = result.as_array().unwrap();
        assert_eq!(modules.len(), 3);
        assert_eq!(modules[1]["module"], "mlx5");
        assert_eq!(
            modules[1]["supported ops"],
            serde_json::json!(["encrypt", "decrypt"])
        );
    }

    #[test]
    fn test_deprecated_alias_routes_to_module_info() {
        let d = dispatcher();
        let current = d.handle(&request(GET_MODULE_INFO, Value::Null), "test");
        for _ in 0..2 {
            let legacy = d.handle(&request("accel_get_engine_info", Value::Null), "test");
            assert_eq!(legacy.result, current.result);
        }
    }

    #[test]
    fn test_deprecation_warning_fires_once() {
        let d = dispatcher();
        assert_eq!(d.resolve_method(GET_MODULE_INFO), (GET_MODULE_INFO, false));
        assert_eq!(
            d.resolve_method("accel_get_engine_info"),
            (GET_MODULE_INFO, true)
        );
        assert_eq!(
            d.resolve_method("accel_get_engine_info"),
            (GET_MODULE_INFO, false)
        );
    }

    #[test]
    fn test_no_param_methods_reject_params() {
        let d = dispatcher();
        let resp = d.handle(
            &request(GET_OPC_ASSIGNMENTS, serde_json::json!({"opname": "copy"})),
            "test",
        );
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);

        let resp = d.handle(&request(GET_MODULE_INFO, serde_json::json!({})), "test");
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_assign_opc_roundtrip() {
        let d = dispatcher();
        let resp = d.handle(
            &request(
                ASSIGN_OPC,
                serde_json::json!({"opname": "encrypt", "module": "mlx5"}),
            ),
            "test",
        );
        assert_eq!(resp.result, Some(Value::Bool(true)));

        let resp = d.handle(&request(GET_OPC_ASSIGNMENTS, Value::Null), "test");
        assert_eq!(resp.result.unwrap()["encrypt"], "mlx5");
    }

    #[test]
    fn test_assign_opc_failures_are_structured() {
        let d = dispatcher();
        let resp = d.handle(
            &request(
                ASSIGN_OPC,
                serde_json::json!({"opname": "encrypt", "module": "nonexistent"}),
            ),
            "test",
        );
        let err = resp.error.unwrap();
        assert_eq!(err.code, UNKNOWN_MODULE);
        assert_eq!(err.kind(), Some("UnknownModule"));

        let resp = d.handle(
            &request(
                ASSIGN_OPC,
                serde_json::json!({"opname": "encrypt", "module": "mlx5_partial"}),
            ),
            "test",
        );
        assert_eq!(resp.error.unwrap().kind(), Some("UnsupportedOperation"));

        let resp = d.handle(
            &request(ASSIGN_OPC, serde_json::json!({"opname": "encrypt"})),
            "test",
        );
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_crypto_key_lifecycle() {
        let d = dispatcher();
        let create = request(
            CRYPTO_KEY_CREATE,
            serde_json::json!({"cipher": "AES_CBC", "key": KEY_HEX, "name": "k1"}),
        );

        let resp = d.handle(&create, "test");
        assert!(resp.error.is_none(), "create should succeed: {:?}", resp.error);

        let resp = d.handle(&create, "test");
        let err = resp.error.unwrap();
        assert_eq!(err.code, DUPLICATE_KEY_NAME);
        assert_eq!(err.kind(), Some("DuplicateKeyName"));

        let resp = d.handle(
            &request(CRYPTO_KEYS_GET, serde_json::json!({"key_name": "k1"})),
            "test",
        );
        let result = resp.result.unwrap();
        let keys = result.as_array().unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0]["name"], "k1");
        assert_eq!(keys[0]["key"], REDACTED);
        assert!(!result.to_string().contains(KEY_HEX));

        let resp = d.handle(
            &request(CRYPTO_KEYS_GET, serde_json::json!({"key_name": "missing"})),
            "test",
        );
        assert_eq!(resp.error.unwrap().code, KEY_NOT_FOUND);

        let resp = d.handle(&request(CRYPTO_KEYS_GET, Value::Null), "test");
        assert_eq!(resp.result.unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_crypto_key_create_bad_hex() {
        let d = dispatcher();
        let resp = d.handle(
            &request(
                CRYPTO_KEY_CREATE,
                serde_json::json!({"cipher": "AES_CBC", "key": "not-hex", "name": "k"}),
            ),
            "test",
        );
        assert_eq!(resp.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_unknown_method() {
        let d = dispatcher();
        let resp = d.handle(&request("accel_crypto_key_destroy", Value::Null), "test");
        assert_eq!(resp.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_invalid_json() {
        let d = dispatcher();
        let resp = d.handle(b"not json at all", "test");
        assert_eq!(resp.error.unwrap().code, -32700);
    }

    #[test]
    fn test_invalid_version() {
        let d = dispatcher();
        let resp = d.handle(
            br#"{"jsonrpc":"1.0","method":"accel_get_module_info","id":4}"#,
            "test",
        );
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(resp.id, Value::from(4));
    }

    #[test]
    fn test_wrong_shape_is_invalid_request() {
        let d = dispatcher();

        let resp = d.handle(br#"{"jsonrpc":"2.0","method":"accel_get_module_info"}"#, "test");
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(resp.id, Value::Null);

        let resp = d.handle(br#"{"jsonrpc":"2.0","method":7,"id":9}"#, "test");
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(resp.id, Value::from(9));

        let resp = d.handle(b"[1, 2]", "test");
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn test_crypto_key_create_empty_name() {
        let d = dispatcher();
        let resp = d.handle(
            &request(
                CRYPTO_KEY_CREATE,
                serde_json::json!({"cipher": "AES_CBC", "key": KEY_HEX, "name": ""}),
            ),
            "test",
        );
        assert_eq!(resp.error.unwrap().kind(), Some("InvalidKeyName"));

        let resp = d.handle(&request(CRYPTO_KEYS_GET, Value::Null), "test");
        assert!(resp.result.unwrap().as_array().unwrap().is_empty());
    }
}
