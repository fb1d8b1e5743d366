// Peer link: one TCP stream, a synchronous send path and a dedicated receive thread
// The receive thread is the only writer of the opponent mirror

use std::io::BufReader;
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, trace, warn};

use crate::game::{BrickGrid, BrickId, MatchPhase, Outcome, Vector2};

use super::protocol::{self, CodecError, WireMessage};

/// Which side of the countdown handshake this peer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Accepted the connection; drives the countdown
    Coordinator,
    /// Connected to the coordinator; waits for its start message
    Follower,
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("received {0} message, but this peer runs the countdown")]
    UnexpectedMessage(&'static str),
    #[error("link is closed")]
    Closed,
}

/// Read-only projection of the opponent's board.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteMirror {
    pub paddle_x: f64,
    pub ball_position: Vector2,
    pub last_destroyed_brick: Option<BrickId>,
    pub bricks: BrickGrid,
}

impl RemoteMirror {
    pub fn new(paddle_x: f64, ball_position: Vector2, bricks: BrickGrid) -> Self {
        Self {
            paddle_x,
            ball_position,
            last_destroyed_brick: None,
            bricks,
        }
    }

    /// Apply a state message: positions always, brick destruction at most once.
    fn apply_state(&mut self, msg: &WireMessage) {
        if let WireMessage::StateSync {
            paddle_x,
            ball_x,
            ball_y,
            ..
        } = *msg
        {
            self.paddle_x = paddle_x;
            self.ball_position = Vector2::new(ball_x, ball_y);
        }

        let Some(corner) = msg.destroyed_brick() else {
            return;
        };
        match self.bricks.layout().cell_at(corner) {
            Some(id) => {
                if self.bricks.destroy(id) {
                    self.last_destroyed_brick = Some(id);
                    debug!(
                        row = id.row,
                        col = id.col,
                        remaining = self.bricks.alive_count(),
                        "opponent destroyed brick"
                    );
                } else {
                    trace!(row = id.row, col = id.col, "brick already dead");
                }
            }
            None => warn!(x = corner.x, y = corner.y, "destroyed brick matches no cell"),
        }
    }
}

/// State shared between the game loop and the receive thread.
/// Always accessed under one mutex so each message is applied as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkState {
    pub phase: MatchPhase,
    /// Result of the match, kept after the link closes
    pub outcome: Option<Outcome>,
    /// Last countdown value announced
    pub countdown: Option<i32>,
    pub mirror: RemoteMirror,
}

impl LinkState {
    pub fn new(mirror: RemoteMirror) -> Self {
        Self {
            phase: MatchPhase::WaitingForPeer,
            outcome: None,
            countdown: None,
            mirror,
        }
    }

    /// Merge one received message into the shared state.
    pub fn apply(&mut self, msg: WireMessage, role: Role) -> Result<(), LinkError> {
        match msg {
            WireMessage::StateSync { .. } => {
                if self.phase != MatchPhase::Closed {
                    self.mirror.apply_state(&msg);
                }
            }
            WireMessage::GameEnd { won } => {
                // The sender reports its own result; ours is the opposite
                let reported = if won { Outcome::Won } else { Outcome::Lost };
                if self.finish(reported.inverse()) {
                    info!(peer_won = won, phase = ?self.phase, "opponent ended the match");
                }
            }
            WireMessage::CountdownTick { tick } => {
                if role == Role::Coordinator {
                    return Err(LinkError::UnexpectedMessage(msg.kind()));
                }
                if matches!(
                    self.phase,
                    MatchPhase::WaitingForPeer | MatchPhase::Countdown
                ) {
                    self.phase = MatchPhase::Countdown;
                    self.countdown = Some(tick);
                    debug!(tick, "countdown");
                }
            }
            WireMessage::Started { started } => {
                if role == Role::Coordinator {
                    return Err(LinkError::UnexpectedMessage(msg.kind()));
                }
                if started
                    && matches!(
                        self.phase,
                        MatchPhase::WaitingForPeer | MatchPhase::Countdown
                    )
                {
                    self.phase = MatchPhase::Playing;
                    self.countdown = None;
                    info!("match started by coordinator");
                }
            }
        }
        Ok(())
    }

    /// Record the match result. Only the first result counts; returns `false`
    /// if the match had already ended or the link is closed.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = outcome.into();
        self.outcome = Some(outcome);
        true
    }

    /// Socket is gone. Any recorded outcome is kept.
    pub fn close(&mut self) {
        if self.phase != MatchPhase::Closed {
            debug!(previous = ?self.phase, "link state closed");
        }
        self.phase = MatchPhase::Closed;
        self.countdown = None;
    }
}

pub type SharedLinkState = Arc<Mutex<LinkState>>;

/// Lock the shared state. The state is plain data, so a panic elsewhere
/// cannot leave it half-updated and a poisoned lock is still usable.
pub fn lock_state(state: &Mutex<LinkState>) -> MutexGuard<'_, LinkState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Something that can put messages on the wire.
pub trait MessageSink {
    fn send(&self, msg: &WireMessage) -> Result<(), LinkError>;
}

/// Cloneable handle to the send half of a link
#[derive(Clone)]
pub struct LinkSender {
    stream: Arc<Mutex<TcpStream>>,
    state: SharedLinkState,
    open: Arc<AtomicBool>,
}

impl LinkSender {
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Write one message on the caller's thread. A failed write closes the
    /// link for good; later sends fail with [`LinkError::Closed`].
    pub fn send(&self, msg: &WireMessage) -> Result<(), LinkError> {
        if !self.is_open() {
            return Err(LinkError::Closed);
        }

        let mut stream = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = protocol::write_message(&mut *stream, msg) {
            warn!(error = %err, kind = msg.kind(), "send failed, closing link");
            let _ = stream.shutdown(Shutdown::Both);
            drop(stream);
            self.open.store(false, Ordering::Release);
            lock_state(&self.state).close();
            return Err(err.into());
        }
        Ok(())
    }
}

impl MessageSink for LinkSender {
    fn send(&self, msg: &WireMessage) -> Result<(), LinkError> {
        LinkSender::send(self, msg)
    }
}

pub struct PeerLink {
    role: Role,
    sender: LinkSender,
    state: SharedLinkState,
    receiver: Option<JoinHandle<()>>,
}

impl PeerLink {
    /// Take ownership of an established stream and start the receive thread.
    /// The peer is connected, so the match moves to the countdown phase.
    pub fn open(stream: TcpStream, role: Role, mirror: RemoteMirror) -> Result<Self, LinkError> {
        let reader = stream.try_clone().map_err(CodecError::from)?;
        let state: SharedLinkState = Arc::new(Mutex::new(LinkState::new(mirror)));
        lock_state(&state).phase = MatchPhase::Countdown;

        let open = Arc::new(AtomicBool::new(true));
        let receiver = {
            let state = state.clone();
            let open = open.clone();
            thread::Builder::new()
                .name("peer-link-rx".to_string())
                .spawn(move || run_receive_loop(reader, role, state, open))
                .map_err(CodecError::from)?
        };

        info!(?role, peer = ?stream.peer_addr().ok(), "peer link open");

        Ok(Self {
            role,
            sender: LinkSender {
                stream: Arc::new(Mutex::new(stream)),
                state: state.clone(),
                open,
            },
            state,
            receiver: Some(receiver),
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn sender(&self) -> LinkSender {
        self.sender.clone()
    }

    pub fn send(&self, msg: &WireMessage) -> Result<(), LinkError> {
        self.sender.send(msg)
    }

    pub fn is_open(&self) -> bool {
        self.sender.is_open()
    }

    pub fn state(&self) -> SharedLinkState {
        self.state.clone()
    }

    pub fn phase(&self) -> MatchPhase {
        lock_state(&self.state).phase
    }

    /// Consistent copy of the shared state for rendering.
    pub fn snapshot(&self) -> LinkState {
        lock_state(&self.state).clone()
    }

    /// Close both directions and wait for the receive thread to exit.
    pub fn shutdown(&mut self) {
        if self.sender.open.swap(false, Ordering::AcqRel) {
            let stream = self
                .sender
                .stream
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let _ = stream.shutdown(Shutdown::Both);
        }
        if let Some(handle) = self.receiver.take() {
            if handle.join().is_err() {
                error!("receive thread panicked");
            }
        }
        lock_state(&self.state).close();
    }
}

impl Drop for PeerLink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Read one message at a time until the stream fails or the link shuts down.
fn run_receive_loop(
    stream: TcpStream,
    role: Role,
    state: SharedLinkState,
    open: Arc<AtomicBool>,
) {
    let mut reader = BufReader::new(stream);

    loop {
        let msg = match protocol::read_message(&mut reader) {
            Ok(msg) => msg,
            Err(err) => {
                if open.load(Ordering::Acquire) {
                    match &err {
                        CodecError::Transport(_) => warn!(error = %err, "peer link lost"),
                        CodecError::Protocol(_) => error!(error = %err, "peer broke protocol"),
                    }
                } else {
                    debug!("receive loop stopped by shutdown");
                }
                break;
            }
        };

        trace!(kind = msg.kind(), "received");
        if let Err(err) = lock_state(&state).apply(msg, role) {
            error!(error = %err, "peer broke protocol");
            break;
        }
    }

    open.store(false, Ordering::Release);
    let _ = reader.get_ref().shutdown(Shutdown::Both);
    lock_state(&state).close();
}
