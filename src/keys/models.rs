// Accelhub - Crypto key data models
//
// SECURITY: key material is private to `CryptoKey`, held in zeroizing
// buffers, and never included in Debug output, log fields, or any
// serialized view. Listing goes through `CryptoKeySummary`, which carries
// only sizes and a redaction marker.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use zeroize::Zeroizing;

use crate::accel::AccelError;

/// Placeholder rendered wherever key material would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

// ─── Cipher ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Cipher {
    #[serde(rename = "AES_CBC")]
    AesCbc,
    #[serde(rename = "AES_XTS")]
    AesXts,
}

impl Cipher {
    pub const ALL: [Cipher; 2] = [Cipher::AesCbc, Cipher::AesXts];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cipher::AesCbc => "AES_CBC",
            Cipher::AesXts => "AES_XTS",
        }
    }

    /// Accepted primary key sizes in bytes (AES-128 and AES-256).
    pub fn key_sizes(&self) -> &'static [usize] {
        &[16, 32]
    }

    /// XTS needs a second (tweak) key; CBC takes none.
    pub fn requires_key2(&self) -> bool {
        matches!(self, Cipher::AesXts)
    }

    /// Check key material against this cipher's size rules.
    pub fn validate_keys(&self, key: &[u8], key2: Option<&[u8]>) -> Result<(), AccelError> {
        if !self.key_sizes().contains(&key.len()) {
            return Err(AccelError::InvalidKeyLength(format!(
                "{} key must be one of {:?} bytes, got {}",
                self,
                self.key_sizes(),
                key.len()
            )));
        }

        match (self.requires_key2(), key2) {
            (true, None) => Err(AccelError::InvalidKeyLength(format!(
                "{} requires key2",
                self
            ))),
            (true, Some(k2)) if k2.len() != key.len() => {
                Err(AccelError::InvalidKeyLength(format!(
                    "{} key2 must be {} bytes to match key, got {}",
                    self,
                    key.len(),
                    k2.len()
                )))
            }
            (true, Some(k2)) if k2 == key => Err(AccelError::InvalidKeyLength(format!(
                "{} key and key2 must differ",
                self
            ))),
            (false, Some(_)) => Err(AccelError::InvalidKeyLength(format!(
                "{} does not take key2",
                self
            ))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cipher {
    type Err = AccelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cipher::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AccelError::InvalidCipher(s.to_string()))
    }
}

// ─── Tweak Mode ──────────────────────────────────────────────────────────────

/// How the per-block tweak is derived from the logical block address.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TweakMode {
    #[default]
    SimpleLba,
    JoinNegLbaWithLba,
    #[serde(rename = "INCR_512_FULL_LBA")]
    Incr512FullLba,
    #[serde(rename = "INCR_512_UPPER_LBA")]
    Incr512UpperLba,
}

impl TweakMode {
    pub const ALL: [TweakMode; 4] = [
        TweakMode::SimpleLba,
        TweakMode::JoinNegLbaWithLba,
        TweakMode::Incr512FullLba,
        TweakMode::Incr512UpperLba,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TweakMode::SimpleLba => "SIMPLE_LBA",
            TweakMode::JoinNegLbaWithLba => "JOIN_NEG_LBA_WITH_LBA",
            TweakMode::Incr512FullLba => "INCR_512_FULL_LBA",
            TweakMode::Incr512UpperLba => "INCR_512_UPPER_LBA",
        }
    }
}

impl fmt::Display for TweakMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TweakMode {
    type Err = AccelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TweakMode::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AccelError::InvalidTweakMode(s.to_string()))
    }
}

// ─── Key Records ─────────────────────────────────────────────────────────────

/// Borrowed input for key creation. Material is copied on acceptance.
#[derive(Clone, Copy)]
pub struct NewCryptoKey<'a> {
    pub name: &'a str,
    pub cipher: &'a str,
    pub key: &'a [u8],
    pub key2: Option<&'a [u8]>,
    pub module: Option<&'a str>,
    pub tweak_mode: Option<&'a str>,
}

impl fmt::Debug for NewCryptoKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCryptoKey")
            .field("name", &self.name)
            .field("cipher", &self.cipher)
            .field("key", &REDACTED)
            .field("key2", &self.key2.map(|_| REDACTED))
            .field("module", &self.module)
            .field("tweak_mode", &self.tweak_mode)
            .finish()
    }
}

/// A stored key. Material is reachable only through `key()` / `key2()`.
pub struct CryptoKey {
    pub name: String,
    pub cipher: Cipher,
    pub tweak_mode: TweakMode,
    pub module: String,
    pub created_at: DateTime<Utc>,
    key: Zeroizing<Vec<u8>>,
    key2: Option<Zeroizing<Vec<u8>>>,
}

impl CryptoKey {
    /// Validate the name and the sizes for `cipher`, then take owned copies
    /// of the material.
    pub fn new(
        name: &str,
        cipher: Cipher,
        tweak_mode: TweakMode,
        key: &[u8],
        key2: Option<&[u8]>,
        module: &str,
    ) -> Result<Self, AccelError> {
        if name.trim().is_empty() {
            return Err(AccelError::InvalidKeyName(name.to_string()));
        }
        cipher.validate_keys(key, key2)?;

        Ok(Self {
            name: name.to_string(),
            cipher,
            tweak_mode,
            module: module.to_string(),
            created_at: Utc::now(),
            key: Zeroizing::new(key.to_vec()),
            key2: key2.map(|k| Zeroizing::new(k.to_vec())),
        })
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn key2(&self) -> Option<&[u8]> {
        self.key2.as_deref().map(|k| k.as_slice())
    }

    pub fn summary(&self) -> CryptoKeySummary {
        CryptoKeySummary {
            name: self.name.clone(),
            cipher: self.cipher,
            key: Redacted,
            key2: self.key2.as_ref().map(|_| Redacted),
            key_size: self.key.len(),
            module: self.module.clone(),
            tweak_mode: self.tweak_mode,
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKey")
            .field("name", &self.name)
            .field("cipher", &self.cipher)
            .field("tweak_mode", &self.tweak_mode)
            .field("module", &self.module)
            .field("key", &REDACTED)
            .field("key2", &self.key2.as_ref().map(|_| REDACTED))
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Serializes as the redaction marker, whatever it stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redacted;

impl Serialize for Redacted {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

/// Externally surfaced view of a key.
#[derive(Debug, Clone, Serialize)]
pub struct CryptoKeySummary {
    pub name: String,
    pub cipher: Cipher,
    pub key: Redacted,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key2: Option<Redacted>,
    pub key_size: usize,
    pub module: String,
    pub tweak_mode: TweakMode,
    pub created_at: DateTime<Utc>,
}

// ─── Tests ───────────────────────────────────────────────────────────────────
