// Connection setup for the two peers
// One side listens and accepts exactly one peer, the other connects to it

use std::io;
use std::net::{TcpListener, TcpStream, ToSocketAddrs};

use tracing::{debug, info};

use super::link::Role;

/// How this process finds its opponent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Wait for the opponent to connect (coordinator)
    Listen { bind: String, port: u16 },

    /// Connect to a listening opponent (follower)
    Connect { addr: String },
}

impl ConnectionMode {
    pub fn role(&self) -> Role {
        match self {
            ConnectionMode::Listen { .. } => Role::Coordinator,
            ConnectionMode::Connect { .. } => Role::Follower,
        }
    }
}

/// Append `default_port` to `target` unless it already names a port.
pub fn with_default_port(target: &str, default_port: u16) -> String {
    let has_port = match target.rsplit_once(':') {
        // Bracketed IPv6 has its port after the closing bracket
        Some((host, port)) => {
            !port.is_empty()
                && port.chars().all(|c| c.is_ascii_digit())
                && (!host.contains(':') || host.ends_with(']'))
        }
        None => false,
    };
    if has_port {
        target.to_string()
    } else {
        format!("{target}:{default_port}")
    }
}

pub fn listen(bind: &str, port: u16) -> io::Result<TcpListener> {
    let listener = TcpListener::bind((bind, port))?;
    info!(addr = ?listener.local_addr().ok(), "listening for opponent");
    Ok(listener)
}

/// Block until one opponent connects. Later connections are never accepted.
pub fn accept_peer(listener: &TcpListener) -> io::Result<TcpStream> {
    let (stream, peer) = listener.accept()?;
    stream.set_nodelay(true)?;
    info!(%peer, "opponent connected");
    Ok(stream)
}

pub fn connect(addr: &str) -> io::Result<TcpStream> {
    let addrs: Vec<_> = addr.to_socket_addrs()?.collect();
    debug!(addr, candidates = addrs.len(), "resolving opponent");
    let stream = TcpStream::connect(&addrs[..])?;
    stream.set_nodelay(true)?;
    info!(peer = ?stream.peer_addr().ok(), "connected to opponent");
    Ok(stream)
}

/// Open the single peer connection for `mode`.
pub fn establish(mode: &ConnectionMode) -> io::Result<(TcpStream, Role)> {
    let stream = match mode {
        ConnectionMode::Listen { bind, port } => accept_peer(&listen(bind, *port)?)?,
        ConnectionMode::Connect { addr } => connect(addr)?,
    };
    Ok((stream, mode.role()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_default_port() {
        assert_eq!(with_default_port("localhost", 6969), "localhost:6969");
        assert_eq!(with_default_port("10.0.0.2:7000", 6969), "10.0.0.2:7000");
        assert_eq!(with_default_port("[::1]", 6969), "[::1]:6969");
        assert_eq!(with_default_port("[::1]:7000", 6969), "[::1]:7000");
    }

    #[test]
    fn test_roles() {
        let listen = ConnectionMode::Listen {
            bind: "0.0.0.0".into(),
            port: 6969,
        };
        let connect = ConnectionMode::Connect {
            addr: "127.0.0.1:6969".into(),
        };
        assert_eq!(listen.role(), Role::Coordinator);
        assert_eq!(connect.role(), Role::Follower);
    }

    #[test]
    fn test_accept_and_connect_over_loopback() {
        let listener = listen("127.0.0.1", 0).unwrap();
        let port = listener.local_addr().unwrap().port();

        let acceptor = thread::spawn(move || accept_peer(&listener).unwrap());
        let (client, role) = establish(&ConnectionMode::Connect {
            addr: format!("127.0.0.1:{port}"),
        })
        .unwrap();
        let server = acceptor.join().unwrap();

        assert_eq!(role, Role::Follower);
        assert!(client.nodelay().unwrap());
        assert_eq!(server.peer_addr().unwrap(), client.local_addr().unwrap());
    }

    #[test]
    fn test_connect_refused() {
        // Bind then drop to get a port nobody listens on
        let port = listen("127.0.0.1", 0).unwrap().local_addr().unwrap().port();
        assert!(connect(&format!("127.0.0.1:{port}")).is_err());
    }
}
