// Accelhub - RPC parameter types
//
// Request parameter structs shared by the server (deserialize) and the
// client (serialize). Optional fields are omitted from the payload when
// absent, never sent as null.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use std::fmt;

use crate::keys::{NewCryptoKey, REDACTED};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignOpcParams {
    pub opname: String,
    pub module: String,
}

/// Key material is hex-encoded on the wire and wiped when this is dropped.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
pub struct CryptoKeyCreateParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub cipher: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweak_mode: Option<String>,
    pub name: String,
}

impl fmt::Debug for CryptoKeyCreateParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKeyCreateParams")
            .field("module", &self.module)
            .field("cipher", &self.cipher)
            .field("key", &REDACTED)
            .field("key2", &self.key2.as_ref().map(|_| REDACTED))
            .field("tweak_mode", &self.tweak_mode)
            .field("name", &self.name)
            .finish()
    }
}

/// Decoded key material, borrowed by `NewCryptoKey`.
pub struct DecodedKeys {
    key: Zeroizing<Vec<u8>>,
    key2: Option<Zeroizing<Vec<u8>>>,
}

impl CryptoKeyCreateParams {
    /// Hex-decode `key` and `key2`.
    pub fn decode(&self) -> Result<DecodedKeys, String> {
        let key = decode_hex("key", &self.key)?;
        let key2 = self
            .key2
            .as_deref()
            .map(|k2| decode_hex("key2", k2))
            .transpose()?;
        Ok(DecodedKeys { key, key2 })
    }

    pub fn as_new_key<'a>(&'a self, decoded: &'a DecodedKeys) -> NewCryptoKey<'a> {
        NewCryptoKey {
            name: &self.name,
            cipher: &self.cipher,
            key: &decoded.key,
            key2: decoded.key2.as_ref().map(|k| k.as_slice()),
            module: self.module.as_deref(),
            tweak_mode: self.tweak_mode.as_deref(),
        }
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Zeroizing<Vec<u8>>, String> {
    hex::decode(value)
        .map(Zeroizing::new)
        .map_err(|e| format!("'{}' is not valid hex: {}", field, e))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CryptoKeysGetParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> CryptoKeyCreateParams {
        CryptoKeyCreateParams {
            module: None,
            cipher: "AES_CBC".to_string(),
            key: "00112233445566778899aabbccddeeff".to_string(),
            key2: None,
            tweak_mode: None,
            name: "k1".to_string(),
        }
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let json = serde_json::to_value(params()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("module"));
        assert!(!obj.contains_key("key2"));
        assert!(!obj.contains_key("tweak_mode"));
        assert_eq!(obj["cipher"], "AES_CBC");
        assert_eq!(obj["name"], "k1");

        let json = serde_json::to_value(CryptoKeysGetParams::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_present_optionals_are_sent() {
        let mut p = params();
        p.module = Some("mlx5".to_string());
        p.key2 = Some("ffeeddccbbaa99887766554433221100".to_string());
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["module"], "mlx5");
        assert!(json["key2"].is_string());
    }

    #[test]
    fn test_decode_hex_keys() {
        let p = params();
        let decoded = p.decode().unwrap();
        let new_key = p.as_new_key(&decoded);
        assert_eq!(new_key.key.len(), 16);
        assert_eq!(new_key.key[0], 0x00);
        assert_eq!(new_key.key[15], 0xff);
        assert!(new_key.key2.is_none());
        assert_eq!(new_key.name, "k1");
    }

    #[test]
    fn test_decode_rejects_bad_hex() {
        let mut p = params();
        p.key = "zz".to_string();
        let err = p.decode().err().unwrap();
        assert!(err.contains("'key'"));
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let debug_output = format!("{:?}", params());
        assert!(debug_output.contains(REDACTED));
        assert!(!debug_output.contains("00112233"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<AssignOpcParams, _> =
            serde_json::from_str(r#"{"opname":"copy","module":"software","force":true}"#);
        assert!(result.is_err());
    }
}
