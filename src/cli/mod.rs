// Accelhub - CLI Module
//
// Command-line interface using clap derive macros. `serve` runs the
// daemon; every other subcommand is a one-shot RPC client call.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::execute;

/// accelhub: accel module registry, opcode assignment and crypto key daemon.
#[derive(Parser, Debug)]
#[command(name = "accelhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the daemon's Unix socket.
    #[arg(short, long, global = true)]
    pub socket: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the daemon on a Unix Domain Socket.
    Serve {
        /// JSON config file with extra modules and default assignments.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show which module every opcode is assigned to.
    GetOpcAssignments,

    /// List modules and the operations each supports.
    GetModuleInfo,

    /// Deprecated name of `get-module-info`.
    #[command(hide = true)]
    GetEngineInfo,

    /// Manually assign an operation to a module.
    AssignOpc {
        /// Name of the operation (e.g. "encrypt", "crc32c").
        #[arg(short, long)]
        opname: String,

        /// Name of the module.
        #[arg(short, long)]
        module: String,
    },

    /// Create a named data encryption key.
    CryptoKeyCreate {
        /// Cipher: AES_CBC or AES_XTS.
        #[arg(short, long)]
        cipher: String,

        /// Key material, hex-encoded.
        #[arg(short, long)]
        key: String,

        /// Second key (AES_XTS only), hex-encoded.
        #[arg(short = 'e', long)]
        key2: Option<String>,

        /// Key name.
        #[arg(short, long)]
        name: String,

        /// Module to bind the key to. Defaults to the module assigned to encrypt.
        #[arg(short, long)]
        module: Option<String>,

        /// Tweak mode, e.g. SIMPLE_LBA or INCR_512_UPPER_LBA.
        #[arg(short, long)]
        tweak_mode: Option<String>,
    },

    /// List crypto keys (material is always redacted).
    CryptoKeysGet {
        /// Only show the key with this name.
        #[arg(short, long)]
        key_name: Option<String>,
    },
}
