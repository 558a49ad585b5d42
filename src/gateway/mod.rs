// Accelhub - Gateway Module
//
// Unix Domain Socket transport for the accel RPC surface: JSON-RPC 2.0
// framing, parameter types, the method dispatcher and a matching client.

pub mod client;
pub mod dispatch;
pub mod params;
pub mod protocol;
mod peer;
mod uds;

pub use client::{ClientError, UdsClient};
pub use dispatch::Dispatcher;
pub use peer::PeerInfo;
pub use uds::UdsServer;
