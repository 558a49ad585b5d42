// Accelhub - UDS Client
//
// Sends JSON-RPC requests to a running daemon over its Unix socket, one
// request line and one response line at a time.

use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Socket error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{} (code {})", .0.message, .0.code)]
    Rpc(JsonRpcError),

    #[error("Server closed the connection")]
    Closed,
}

pub struct UdsClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

impl UdsClient {
    pub async fn connect(socket_path: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(socket_path).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(reader).lines(),
            writer,
            next_id: 1,
        })
    }

    /// Call `method`. `None` params are left out of the request entirely.
    pub async fn call<P: Serialize>(
        &mut self,
        method: &str,
        params: Option<P>,
    ) -> Result<Value, ClientError> {
        let params = params
            .map(|p| serde_json::to_value(p))
            .transpose()?
            .unwrap_or(Value::Null);

        let id = self.next_id;
        self.next_id += 1;

        let mut line = serde_json::to_string(&JsonRpcRequest::new(method, params, id))?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        let raw = self.lines.next_line().await?.ok_or(ClientError::Closed)?;
        let response: JsonRpcResponse = serde_json::from_str(&raw)?;
        response.into_result().map_err(ClientError::Rpc)
    }
}
