// Accelhub - CLI Command Handlers
//
// `serve` builds the accel service from configuration and runs the UDS
// server. The remaining commands each send one request to a running
// daemon and pretty-print the result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::accel::AccelService;
use crate::config::AccelConfig;
use crate::gateway::dispatch::{
    deprecated_alias, ASSIGN_OPC, CRYPTO_KEYS_GET, CRYPTO_KEY_CREATE, GET_MODULE_INFO,
    GET_OPC_ASSIGNMENTS,
};
use crate::gateway::params::{AssignOpcParams, CryptoKeyCreateParams, CryptoKeysGetParams};
use crate::gateway::{Dispatcher, UdsClient, UdsServer};
use crate::Result;

use super::{Cli, Commands};

/// Execute the parsed CLI command.
pub async fn execute(cli: Cli) -> Result<()> {
    let socket = cli.socket;

    match cli.command {
        Commands::Serve { config } => cmd_serve(socket, config).await,
        Commands::GetOpcAssignments => call(socket, GET_OPC_ASSIGNMENTS, None::<()>).await,
        Commands::GetModuleInfo => call(socket, GET_MODULE_INFO, None::<()>).await,
        Commands::GetEngineInfo => {
            warn_deprecated("accel_get_engine_info");
            call(socket, GET_MODULE_INFO, None::<()>).await
        }
        Commands::AssignOpc { opname, module } => {
            call(socket, ASSIGN_OPC, Some(AssignOpcParams { opname, module })).await
        }
        Commands::CryptoKeyCreate {
            cipher,
            key,
            key2,
            name,
            module,
            tweak_mode,
        } => {
            let params = CryptoKeyCreateParams {
                module,
                cipher,
                key,
                key2,
                tweak_mode,
                name,
            };
            call(socket, CRYPTO_KEY_CREATE, Some(&params)).await
        }
        Commands::CryptoKeysGet { key_name } => {
            call(socket, CRYPTO_KEYS_GET, Some(CryptoKeysGetParams { key_name })).await
        }
    }
}

// ─── Serve ───────────────────────────────────────────────────────────────────

async fn cmd_serve(socket: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let config = AccelConfig::load(config.as_deref())?;
    let socket_path = config.socket_path(socket.as_deref());

    let service = AccelService::from_config(&config)?;
    for info in service.get_module_info() {
        tracing::info!(
            module = %info.module,
            operations = info.supported_ops.len(),
            "Module available"
        );
    }

    let dispatcher = Arc::new(Dispatcher::new(Arc::new(service)));
    let server = UdsServer::new(socket_path, dispatcher);
    server.run().await?;

    Ok(())
}

// ─── Client Calls ────────────────────────────────────────────────────────────

async fn call<P: Serialize>(
    socket: Option<PathBuf>,
    method: &str,
    params: Option<P>,
) -> Result<()> {
    let socket_path = client_socket_path(socket.as_deref())?;
    let mut client = UdsClient::connect(&socket_path).await?;
    let result = client.call(method, params).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// The client honours the same socket resolution as the daemon.
fn client_socket_path(explicit: Option<&Path>) -> Result<PathBuf> {
    let config = AccelConfig::load(None)?;
    Ok(config.socket_path(explicit))
}

fn warn_deprecated(method: &str) {
    if let Some((old, new)) = deprecated_alias(method) {
        eprintln!("{} is deprecated, use {} instead.", old, new);
    }
}
