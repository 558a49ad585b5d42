// Accelhub - Accel Module
//
// Opcode-to-module dispatch state: the module registry, the opcode
// assignment table and the service that ties them to the key store.

mod assignments;
mod error;
mod module;
mod opcode;
mod service;

pub use assignments::AssignmentTable;
pub use error::AccelError;
pub use module::{CryptoCaps, Module, ModuleInfo, ModuleRegistry, SOFTWARE_MODULE};
pub use opcode::Opcode;
pub use service::AccelService;
