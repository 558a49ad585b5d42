// Accelhub - Accel error types
//
// Request-local validation failures. None of these are fatal to the daemon;
// every one is returned to the caller as a structured error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccelError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown opcode: {0}")]
    UnknownOpcode(String),

    #[error("Module '{module}' does not support operation '{opcode}'")]
    UnsupportedOperation { module: String, opcode: String },

    #[error("Invalid crypto key name: {0:?}")]
    InvalidKeyName(String),

    #[error("Crypto key already exists: {0}")]
    DuplicateKeyName(String),

    #[error("Invalid cipher: {0}")]
    InvalidCipher(String),

    #[error("Invalid tweak mode: {0}")]
    InvalidTweakMode(String),

    #[error("Invalid key length: {0}")]
    InvalidKeyLength(String),

    #[error("Module '{module}' does not support cipher {cipher}")]
    UnsupportedCipher { module: String, cipher: String },

    #[error("Module '{module}' does not support tweak mode {tweak_mode}")]
    UnsupportedTweakMode { module: String, tweak_mode: String },

    #[error("Crypto key not found: {0}")]
    KeyNotFound(String),
}

impl AccelError {
    /// Stable machine-readable name of the failure, surfaced on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownModule(_) => "UnknownModule",
            Self::UnknownOpcode(_) => "UnknownOpcode",
            Self::UnsupportedOperation { .. } => "UnsupportedOperation",
            Self::InvalidKeyName(_) => "InvalidKeyName",
            Self::DuplicateKeyName(_) => "DuplicateKeyName",
            Self::InvalidCipher(_) => "InvalidCipher",
            Self::InvalidTweakMode(_) => "InvalidTweakMode",
            Self::InvalidKeyLength(_) => "InvalidKeyLength",
            Self::UnsupportedCipher { .. } => "UnsupportedCipher",
            Self::UnsupportedTweakMode { .. } => "UnsupportedTweakMode",
            Self::KeyNotFound(_) => "KeyNotFound",
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant_name() {
        let err = AccelError::UnsupportedOperation {
            module: "mlx5_partial".to_string(),
            opcode: "encrypt".to_string(),
        };
        assert_eq!(err.kind(), "UnsupportedOperation");
        assert_eq!(AccelError::KeyNotFound("k".into()).kind(), "KeyNotFound");
    }

    #[test]
    fn test_display_names_module_and_opcode() {
        let err = AccelError::UnsupportedOperation {
            module: "mlx5_partial".to_string(),
            opcode: "encrypt".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("mlx5_partial"));
        assert!(msg.contains("encrypt"));
    }
}
