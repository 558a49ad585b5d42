// Accelhub - Unix Domain Socket Server
//
// Listens on a Unix domain socket for newline-delimited JSON-RPC 2.0
// requests. Each connection is handled in a spawned tokio task; all of
// them share one dispatcher and therefore one set of stores.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

use super::dispatch::Dispatcher;
use super::peer::PeerInfo;

/// Unix Domain Socket server for accelhub.
pub struct UdsServer {
    socket_path: PathBuf,
    dispatcher: Arc<Dispatcher>,
}

impl UdsServer {
    pub fn new(socket_path: PathBuf, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            socket_path,
            dispatcher,
        }
    }

    /// Bind the socket (owner-only) and serve until the process is terminated.
    pub async fn run(&self) -> io::Result<()> {
        let listener = self.bind().await?;
        tracing::info!(
            socket = %self.socket_path.display(),
            "accelhub UDS server listening"
        );
        self.serve(listener).await
    }

    async fn bind(&self) -> io::Result<UnixListener> {
        if let Some(parent) = self.socket_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Remove stale socket file if it exists
        if self.socket_path.exists() {
            tokio::fs::remove_file(&self.socket_path).await?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.socket_path, perms)?;
        }

        Ok(listener)
    }

    /// Accept connections on an already bound listener.
    pub async fn serve(&self, listener: UnixListener) -> io::Result<()> {
        loop {
            let (stream, _addr) = listener.accept().await?;
            let dispatcher = Arc::clone(&self.dispatcher);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, &dispatcher).await {
                    tracing::error!("Connection handler error: {}", e);
                }
            });
        }
    }
}

/// Handle a single client connection.
/// Reads newline-delimited JSON-RPC requests and writes one response line each.
async fn handle_connection(stream: UnixStream, dispatcher: &Dispatcher) -> io::Result<()> {
    let actor = match PeerInfo::from_stream(&stream) {
        Ok(info) => {
            tracing::debug!(%info, "Client connected");
            info.actor_string()
        }
        Err(_) => "uds-client".to_string(),
    };

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    // Raw bytes, so a line that is not UTF-8 still gets a parse error back.
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let response = dispatcher.handle(&line, &actor);
        let mut json = serde_json::to_string(&response)?;
        json.push('\n');
        writer.write_all(json.as_bytes()).await?;
        writer.flush().await?;
    }

    tracing::debug!(actor = %actor, "Client disconnected");
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
