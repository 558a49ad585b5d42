// Accelhub - Configuration
//
// Startup configuration: extra accel modules, default opcode assignments
// and the socket path. Read from a JSON file, with environment variable
// and command-line overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::accel::AccelError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "ACCELHUB_CONFIG";

/// Environment variable naming the UDS path.
pub const SOCKET_ENV: &str = "ACCELHUB_SOCKET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Module '{module}': {source}")]
    Module {
        module: String,
        #[source]
        source: AccelError,
    },

    #[error("Module name '{0}' is reserved for the built-in module")]
    ReservedModule(String),

    #[error("Module '{0}' is declared more than once")]
    DuplicateModule(String),

    #[error("Default assignment rejected: {0}")]
    Assignment(#[source] AccelError),
}

/// One accel module as declared in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleConfig {
    pub name: String,
    pub operations: Vec<String>,
    #[serde(default)]
    pub ciphers: Vec<String>,
    #[serde(default)]
    pub tweak_modes: Vec<String>,
}

/// Top-level daemon configuration.
///
/// ```json
/// {
///   "socket_path": "/run/accelhub.sock",
///   "modules": [
///     { "name": "mlx5", "operations": ["encrypt", "decrypt"], "ciphers": ["AES_XTS"] }
///   ],
///   "assignments": { "encrypt": "mlx5" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccelConfig {
    pub socket_path: Option<PathBuf>,
    pub modules: Vec<ModuleConfig>,
    /// opname -> module, applied over the software defaults.
    pub assignments: BTreeMap<String, String>,
}

impl AccelConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `explicit`, then `$ACCELHUB_CONFIG`, then the default
    /// location if a file exists there. Falls back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
            return Self::from_file(&path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Socket path: `explicit`, then `$ACCELHUB_SOCKET`, then the config
    /// file, then the runtime-dir default.
    pub fn socket_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(SOCKET_ENV).map(PathBuf::from))
            .or_else(|| self.socket_path.clone())
            .unwrap_or_else(default_socket_path)
    }
}

/// `<config_dir>/accelhub/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("accelhub").join("config.json"))
}

/// `$XDG_RUNTIME_DIR/accelhub/accelhub.sock`, falling back to `/tmp`.
pub fn default_socket_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"));
    runtime_dir.join("accelhub").join("accelhub.sock")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
