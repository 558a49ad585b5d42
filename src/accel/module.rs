// Accelhub - Module Registry
//
// The set of execution modules known to the daemon and the opcodes and
// crypto capabilities each one supports. Built once at startup and never
// mutated afterwards, so readers share it without locking.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{AccelConfig, ConfigError, ModuleConfig};
use crate::keys::{Cipher, TweakMode};

use super::{AccelError, Opcode};

/// Name of the built-in module that implements every opcode.
pub const SOFTWARE_MODULE: &str = "software";

/// Ciphers and tweak modes a module can bind keys to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CryptoCaps {
    pub ciphers: BTreeSet<Cipher>,
    pub tweak_modes: BTreeSet<TweakMode>,
}

impl CryptoCaps {
    pub fn all() -> Self {
        Self {
            ciphers: Cipher::ALL.into_iter().collect(),
            tweak_modes: TweakMode::ALL.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    operations: BTreeSet<Opcode>,
    crypto: CryptoCaps,
}

impl Module {
    pub fn new(name: impl Into<String>, operations: impl IntoIterator<Item = Opcode>) -> Self {
        Self {
            name: name.into(),
            operations: operations.into_iter().collect(),
            crypto: CryptoCaps::default(),
        }
    }

    pub fn with_crypto(mut self, crypto: CryptoCaps) -> Self {
        self.crypto = crypto;
        self
    }

    /// The built-in fallback module.
    pub fn software() -> Self {
        Self::new(SOFTWARE_MODULE, Opcode::ALL).with_crypto(CryptoCaps::all())
    }

    /// Build a module from its configuration entry.
    ///
    /// A module that lists ciphers but no tweak modes gets `SIMPLE_LBA`.
    pub fn from_config(config: &ModuleConfig) -> Result<Self, AccelError> {
        let operations = config
            .operations
            .iter()
            .map(|s| s.parse::<Opcode>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        let ciphers = config
            .ciphers
            .iter()
            .map(|s| s.parse::<Cipher>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        let mut tweak_modes = config
            .tweak_modes
            .iter()
            .map(|s| s.parse::<TweakMode>())
            .collect::<Result<BTreeSet<_>, _>>()?;

        if !ciphers.is_empty() && tweak_modes.is_empty() {
            tweak_modes.insert(TweakMode::default());
        }

        Ok(Self {
            name: config.name.clone(),
            operations,
            crypto: CryptoCaps {
                ciphers,
                tweak_modes,
            },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supports(&self, opcode: Opcode) -> bool {
        self.operations.contains(&opcode)
    }

    pub fn operations(&self) -> impl Iterator<Item = Opcode> + '_ {
        self.operations.iter().copied()
    }

    /// Whether keys for `cipher` in `tweak_mode` can be bound to this module.
    pub fn check_crypto(&self, cipher: Cipher, tweak_mode: TweakMode) -> Result<(), AccelError> {
        if !self.crypto.ciphers.contains(&cipher) {
            return Err(AccelError::UnsupportedCipher {
                module: self.name.clone(),
                cipher: cipher.to_string(),
            });
        }
        if !self.crypto.tweak_modes.contains(&tweak_mode) {
            return Err(AccelError::UnsupportedTweakMode {
                module: self.name.clone(),
                tweak_mode: tweak_mode.to_string(),
            });
        }
        Ok(())
    }

    pub fn info(&self) -> ModuleInfo {
        ModuleInfo {
            module: self.name.clone(),
            supported_ops: self.operations().collect(),
        }
    }
}

/// Wire view of a module: its name and supported operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub module: String,
    #[serde(rename = "supported ops")]
    pub supported_ops: Vec<Opcode>,
}

// ─── Registry ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
}

impl ModuleRegistry {
    /// Register `software` followed by `extra`, in order.
    pub fn with_modules(extra: impl IntoIterator<Item = Module>) -> Result<Self, ConfigError> {
        let mut modules = vec![Module::software()];

        for module in extra {
            if module.name == SOFTWARE_MODULE {
                return Err(ConfigError::ReservedModule(module.name));
            }
            if modules.iter().any(|m| m.name == module.name) {
                return Err(ConfigError::DuplicateModule(module.name));
            }
            tracing::debug!(
                module = %module.name,
                operations = module.operations.len(),
                "Registered accel module"
            );
            modules.push(module);
        }

        Ok(Self { modules })
    }

    pub fn from_config(config: &AccelConfig) -> Result<Self, ConfigError> {
        let modules = config
            .modules
            .iter()
            .map(|m| {
                Module::from_config(m).map_err(|source| ConfigError::Module {
                    module: m.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_modules(modules)
    }

    pub fn get(&self, name: &str) -> Result<&Module, AccelError> {
        self.modules
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| AccelError::UnknownModule(name.to_string()))
    }

    /// All modules in registration order.
    pub fn list(&self) -> Vec<ModuleInfo> {
        self.modules.iter().map(Module::info).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self {
            modules: vec![Module::software()],
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn module_config(name: &str, ops: &[&str], ciphers: &[&str]) -> ModuleConfig {
        ModuleConfig {
            name: name.to_string(),
            operations: ops.iter().map(|s| s.to_string()).collect(),
            ciphers: ciphers.iter().map(|s| s.to_string()).collect(),
            tweak_modes: vec![],
        }
    }

    #[test]
    fn test_default_registry_has_software_only() {
        let registry = ModuleRegistry::default();
        assert_eq!(registry.len(), 1);

        let software = registry.get(SOFTWARE_MODULE).unwrap();
        for op in Opcode::ALL {
            assert!(software.supports(op));
        }
    }

    #[test]
    fn test_software_registered_first() {
        let registry =
            ModuleRegistry::with_modules([Module::new("mlx5", [Opcode::Encrypt])]).unwrap();
        let names: Vec<String> = registry.list().into_iter().map(|i| i.module).collect();
        assert_eq!(names, vec!["software", "mlx5"]);
    }

    #[test]
    fn test_unknown_module_lookup() {
        let registry = ModuleRegistry::default();
        assert_eq!(
            registry.get("nonexistent").unwrap_err(),
            AccelError::UnknownModule("nonexistent".to_string())
        );
    }

    #[test]
    fn test_duplicate_and_reserved_names_rejected() {
        let dup = ModuleRegistry::with_modules([
            Module::new("mlx5", [Opcode::Copy]),
            Module::new("mlx5", [Opcode::Crc32c]),
        ]);
        assert!(matches!(dup, Err(ConfigError::DuplicateModule(name)) if name == "mlx5"));

        let reserved = ModuleRegistry::with_modules([Module::new("software", [Opcode::Copy])]);
        assert!(matches!(reserved, Err(ConfigError::ReservedModule(_))));
    }

    #[test]
    fn test_module_from_config() {
        let module =
            Module::from_config(&module_config("mlx5", &["encrypt", "decrypt"], &["AES_XTS"]))
                .unwrap();
        assert!(module.supports(Opcode::Encrypt));
        assert!(!module.supports(Opcode::Copy));
        assert!(module
            .check_crypto(Cipher::AesXts, TweakMode::SimpleLba)
            .is_ok());
        assert_eq!(
            module
                .check_crypto(Cipher::AesCbc, TweakMode::SimpleLba)
                .unwrap_err()
                .kind(),
            "UnsupportedCipher"
        );
        assert_eq!(
            module
                .check_crypto(Cipher::AesXts, TweakMode::Incr512FullLba)
                .unwrap_err()
                .kind(),
            "UnsupportedTweakMode"
        );
    }

    #[test]
    fn test_module_from_config_rejects_unknown_opcode() {
        let err = Module::from_config(&module_config("dsa", &["teleport"], &[])).unwrap_err();
        assert_eq!(err, AccelError::UnknownOpcode("teleport".to_string()));
    }

    #[test]
    fn test_module_info_wire_format() {
        let info = Module::new("mlx5", [Opcode::Decrypt, Opcode::Encrypt]).info();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["module"], "mlx5");
        assert_eq!(json["supported ops"], serde_json::json!(["encrypt", "decrypt"]));
    }
}
