// Peer-to-peer networking for Breakout Duel
// One TCP connection per match, a blocking receive thread and synchronous sends

pub mod countdown;
pub mod link;
pub mod protocol;
pub mod transport;

pub use countdown::CountdownCoordinator;
pub use link::{
    lock_state, LinkError, LinkSender, LinkState, MessageSink, PeerLink, RemoteMirror, Role,
    SharedLinkState,
};
pub use protocol::{CodecError, WireMessage};
pub use transport::{establish, ConnectionMode};
