// Accelhub - Library root
//
// Re-exports the accel, keys, config, gateway and CLI modules.

pub mod accel;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod keys;

pub use error::{HubError, Result};
