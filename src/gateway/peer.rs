// Accelhub - Peer identification
//
// Identifies the process on the other end of a UDS connection from its
// socket credentials, so that mutations can be attributed in the logs.

use std::fmt;
use std::io;

use tokio::net::UnixStream;

/// Credentials of the connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerInfo {
    pub pid: Option<i32>,
    pub uid: u32,
    pub gid: u32,
}

impl PeerInfo {
    /// Read `SO_PEERCRED` (or the platform equivalent) from the stream.
    pub fn from_stream(stream: &UnixStream) -> io::Result<Self> {
        let cred = stream.peer_cred()?;
        Ok(Self {
            pid: cred.pid(),
            uid: cred.uid(),
            gid: cred.gid(),
        })
    }

    /// Short actor string for log fields.
    pub fn actor_string(&self) -> String {
        match self.pid {
            Some(pid) => format!("pid:{} uid:{}", pid, self.uid),
            None => format!("uid:{}", self.uid),
        }
    }
}

impl fmt::Display for PeerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "PID {} (uid {}, gid {})", pid, self.uid, self.gid),
            None => write!(f, "unknown PID (uid {}, gid {})", self.uid, self.gid),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_string_format() {
        let info = PeerInfo {
            pid: Some(12345),
            uid: 1000,
            gid: 1000,
        };
        assert_eq!(info.actor_string(), "pid:12345 uid:1000");

        let anonymous = PeerInfo { pid: None, ..info };
        assert_eq!(anonymous.actor_string(), "uid:1000");
    }

    #[test]
    fn test_display_format() {
        let info = PeerInfo {
            pid: Some(42),
            uid: 0,
            gid: 0,
        };
        let display = format!("{}", info);
        assert!(display.contains("PID 42"));
        assert!(display.contains("uid 0"));
    }

    #[tokio::test]
    async fn test_peer_of_socket_pair_is_this_process() {
        let (a, _b) = UnixStream::pair().unwrap();
        let info = PeerInfo::from_stream(&a).unwrap();
        if cfg!(target_os = "linux") {
            assert_eq!(info.pid, Some(std::process::id() as i32));
        }
    }
}
