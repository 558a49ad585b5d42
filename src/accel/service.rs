// Accelhub - Accel Service
//
// Owns the module registry, the opcode assignment table and the crypto key
// store, and implements the operations that span them. No lock is held
// while another store is consulted.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{AccelConfig, ConfigError};
use crate::keys::{
    Cipher, CryptoKey, CryptoKeyStore, CryptoKeySummary, InMemoryKeyStore, NewCryptoKey, TweakMode,
};

use super::assignments::AssignmentTable;
use super::module::{ModuleInfo, ModuleRegistry};
use super::{AccelError, Opcode};

pub struct AccelService {
    registry: Arc<ModuleRegistry>,
    assignments: AssignmentTable,
    keys: InMemoryKeyStore,
}

impl AccelService {
    pub fn new(registry: ModuleRegistry) -> Self {
        let registry = Arc::new(registry);
        Self {
            assignments: AssignmentTable::new(Arc::clone(&registry)),
            registry,
            keys: InMemoryKeyStore::new(),
        }
    }

    /// Build the registry and the initial assignments from configuration.
    pub fn from_config(config: &AccelConfig) -> Result<Self, ConfigError> {
        let registry = Arc::new(ModuleRegistry::from_config(config)?);
        let assignments =
            AssignmentTable::with_overrides(Arc::clone(&registry), &config.assignments)?;

        tracing::info!(
            modules = registry.len(),
            overrides = config.assignments.len(),
            "Accel service initialized"
        );

        Ok(Self {
            registry,
            assignments,
            keys: InMemoryKeyStore::new(),
        })
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    // ─── Modules & Assignments ───────────────────────────────────────────

    pub fn get_module_info(&self) -> Vec<ModuleInfo> {
        self.registry.list()
    }

    pub fn get_opc_assignments(&self) -> BTreeMap<Opcode, String> {
        self.assignments.get_assignments()
    }

    pub fn assign_opc(&self, opname: &str, module: &str) -> Result<(), AccelError> {
        self.assignments.assign_name(opname, module)
    }

    // ─── Crypto Keys ─────────────────────────────────────────────────────

    /// Validate and store a new key.
    ///
    /// Without an explicit module the key is bound to whichever module
    /// currently executes `encrypt`. Every check runs before the key store
    /// is touched.
    pub fn crypto_key_create(&self, new: NewCryptoKey<'_>) -> Result<(), AccelError> {
        let cipher = new.cipher.parse::<Cipher>()?;
        let tweak_mode = new
            .tweak_mode
            .map(str::parse::<TweakMode>)
            .transpose()?
            .unwrap_or_default();

        let module_name = match new.module {
            Some(name) => name.to_string(),
            None => self.assignments.module_for(Opcode::Encrypt),
        };
        let module = self.registry.get(&module_name)?;

        let key = CryptoKey::new(new.name, cipher, tweak_mode, new.key, new.key2, module.name())?;
        module.check_crypto(cipher, tweak_mode)?;

        self.keys.insert(key)
    }

    /// One key by name, or all keys in creation order.
    pub fn crypto_keys_get(&self, name: Option<&str>) -> Result<Vec<CryptoKeySummary>, AccelError> {
        match name {
            Some(name) => Ok(vec![self.keys.get(name)?]),
            None => Ok(self.keys.list()),
        }
    }
}

impl Default for AccelService {
    fn default() -> Self {
        Self::new(ModuleRegistry::default())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
