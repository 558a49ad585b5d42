// Accelhub - Opcode Assignment Table
//
// Total mapping from every opcode to the module that executes it. The
// assigned module always supports its opcode: validation runs before the
// write lock is taken and the swap happens in one step under it.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ConfigError;

use super::module::{ModuleRegistry, SOFTWARE_MODULE};
use super::{AccelError, Opcode};

pub struct AssignmentTable {
    registry: Arc<ModuleRegistry>,
    table: RwLock<BTreeMap<Opcode, String>>,
}

impl AssignmentTable {
    /// Every opcode starts on the software module.
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        let table = Opcode::ALL
            .into_iter()
            .map(|op| (op, SOFTWARE_MODULE.to_string()))
            .collect();

        Self {
            registry,
            table: RwLock::new(table),
        }
    }

    /// Start from the defaults and apply configured `opname -> module` overrides.
    pub fn with_overrides(
        registry: Arc<ModuleRegistry>,
        overrides: &BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let table = Self::new(registry);
        for (opname, module) in overrides {
            table
                .assign_name(opname, module)
                .map_err(ConfigError::Assignment)?;
        }
        Ok(table)
    }

    /// Snapshot of the whole table, ordered by opcode.
    pub fn get_assignments(&self) -> BTreeMap<Opcode, String> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Module currently assigned to `opcode`.
    pub fn module_for(&self, opcode: Opcode) -> String {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table
            .get(&opcode)
            .cloned()
            .unwrap_or_else(|| SOFTWARE_MODULE.to_string())
    }

    /// Reassign `opcode` to `module`.
    pub fn assign(&self, opcode: Opcode, module: &str) -> Result<(), AccelError> {
        let target = self.registry.get(module)?;
        if !target.supports(opcode) {
            return Err(AccelError::UnsupportedOperation {
                module: module.to_string(),
                opcode: opcode.to_string(),
            });
        }

        let previous = {
            let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
            table.insert(opcode, module.to_string())
        };

        tracing::info!(
            opcode = %opcode,
            module = %module,
            previous = previous.as_deref().unwrap_or("-"),
            "Opcode assigned"
        );

        Ok(())
    }

    /// Like `assign`, with the opcode given by its wire name.
    pub fn assign_name(&self, opname: &str, module: &str) -> Result<(), AccelError> {
        let opcode = opname.parse::<Opcode>()?;
        self.assign(opcode, module)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
