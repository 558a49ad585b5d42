// Accelhub - Crypto key store
//
// Named key records kept in creation order. The duplicate check and the
// insert happen under a single write lock, so two concurrent creations
// of the same name can never both succeed.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::accel::AccelError;

use super::models::{CryptoKey, CryptoKeySummary};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over crypto key storage.
pub trait CryptoKeyStore {
    /// Store a validated key. Fails with `DuplicateKeyName` if the name is taken.
    fn insert(&self, key: CryptoKey) -> Result<(), AccelError>;

    /// Redacted view of one key by name.
    fn get(&self, name: &str) -> Result<CryptoKeySummary, AccelError>;

    /// Redacted views of every key, in creation order.
    fn list(&self) -> Vec<CryptoKeySummary>;

    fn contains(&self, name: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── In-Memory Implementation ────────────────────────────────────────────────

#[derive(Default)]
struct KeyTable {
    keys: Vec<CryptoKey>,
    by_name: HashMap<String, usize>,
}

/// Process-lifetime key store. Keys are never removed.
#[derive(Default)]
pub struct InMemoryKeyStore {
    table: RwLock<KeyTable>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CryptoKeyStore for InMemoryKeyStore {
    fn insert(&self, key: CryptoKey) -> Result<(), AccelError> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);

        if table.by_name.contains_key(&key.name) {
            return Err(AccelError::DuplicateKeyName(key.name.clone()));
        }

        tracing::info!(
            key_name = %key.name,
            cipher = %key.cipher,
            module = %key.module,
            tweak_mode = %key.tweak_mode,
            "Crypto key created"
        );

        let index = table.keys.len();
        table.by_name.insert(key.name.clone(), index);
        table.keys.push(key);

        Ok(())
    }

    fn get(&self, name: &str) -> Result<CryptoKeySummary, AccelError> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table
            .by_name
            .get(name)
            .map(|&i| table.keys[i].summary())
            .ok_or_else(|| AccelError::KeyNotFound(name.to_string()))
    }

    fn list(&self) -> Vec<CryptoKeySummary> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.keys.iter().map(CryptoKey::summary).collect()
    }

    fn contains(&self, name: &str) -> bool {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.by_name.contains_key(name)
    }

    fn len(&self) -> usize {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.keys.len()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
