// Breakout Duel wire protocol
// Fixed-width big-endian frames, no length prefix: a 4-byte discriminator
// followed by a payload whose size is implied by the discriminator

use std::io::{self, Read, Write};

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::game::Vector2;

/// Messages exchanged between the two peers.
///
/// Variant order is the wire discriminator (0..=3) and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WireMessage {
    /// Per-tick state. Brick coordinates are the top-left corner of the brick
    /// destroyed this tick, or (0, 0) when none was.
    StateSync {
        paddle_x: f64,
        ball_x: f64,
        ball_y: f64,
        brick_x: f64,
        brick_y: f64,
    },

    /// Sender's own result
    GameEnd { won: bool },

    /// Countdown value from the accepting peer, descending to 0
    CountdownTick { tick: i32 },

    /// Sent once after tick 0 to release the other peer
    Started { started: bool },
}

impl WireMessage {
    pub fn state_sync(paddle_x: f64, ball: Vector2, destroyed_brick: Option<Vector2>) -> Self {
        let brick = destroyed_brick.unwrap_or_default();
        WireMessage::StateSync {
            paddle_x,
            ball_x: ball.x,
            ball_y: ball.y,
            brick_x: brick.x,
            brick_y: brick.y,
        }
    }

    /// Brick corner carried by a state message, `None` for the (0, 0) sentinel.
    pub fn destroyed_brick(&self) -> Option<Vector2> {
        match *self {
            WireMessage::StateSync {
                brick_x, brick_y, ..
            } if brick_x != 0.0 || brick_y != 0.0 => Some(Vector2::new(brick_x, brick_y)),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            WireMessage::StateSync { .. } => "state-sync",
            WireMessage::GameEnd { .. } => "game-end",
            WireMessage::CountdownTick { .. } => "countdown-tick",
            WireMessage::Started { .. } => "started",
        }
    }
}

/// Error reading or writing a frame.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    #[error("protocol violation: {0}")]
    Protocol(String),
}

impl From<bincode::Error> for CodecError {
    fn from(err: bincode::Error) -> Self {
        match *err {
            bincode::ErrorKind::Io(io) => CodecError::Transport(io),
            other => CodecError::Protocol(other.to_string()),
        }
    }
}

/// u32 variant index, i32 and f64 all fixed-width big-endian; bool is one byte.
fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_big_endian()
}

/// Serialize message to bytes for transmission
pub fn encode(msg: &WireMessage) -> Result<Vec<u8>, CodecError> {
    Ok(wire_options().serialize(msg)?)
}

/// Decode exactly one message from the front of `bytes`
pub fn decode(bytes: &[u8]) -> Result<WireMessage, CodecError> {
    let mut reader = bytes;
    read_message(&mut reader)
}

/// Write one message as a single buffer
pub fn write_message<W: Write>(writer: &mut W, msg: &WireMessage) -> Result<(), CodecError> {
    let bytes = encode(msg)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Block until one full message has been read
pub fn read_message<R: Read>(reader: &mut R) -> Result<WireMessage, CodecError> {
    Ok(wire_options().deserialize_from(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_sync_layout() {
        let msg = WireMessage::state_sync(
            170.0,
            Vector2::new(190.0, 290.0),
            Some(Vector2::new(122.0, 94.0)),
        );
        let bytes = encode(&msg).unwrap();

        assert_eq!(bytes.len(), 4 + 5 * 8);
        assert_eq!(&bytes[..4], &[0, 0, 0, 0]);
        assert_eq!(&bytes[4..12], &170.0f64.to_be_bytes());
        assert_eq!(&bytes[12..20], &190.0f64.to_be_bytes());
        assert_eq!(&bytes[20..28], &290.0f64.to_be_bytes());
        assert_eq!(&bytes[28..36], &122.0f64.to_be_bytes());
        assert_eq!(&bytes[36..44], &94.0f64.to_be_bytes());

        assert_eq!(decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_small_message_layouts() {
        assert_eq!(
            encode(&WireMessage::GameEnd { won: true }).unwrap(),
            vec![0, 0, 0, 1, 1]
        );
        assert_eq!(
            encode(&WireMessage::CountdownTick { tick: 3 }).unwrap(),
            vec![0, 0, 0, 2, 0, 0, 0, 3]
        );
        assert_eq!(
            encode(&WireMessage::Started { started: true }).unwrap(),
            vec![0, 0, 0, 3, 1]
        );
    }

    #[test]
    fn test_sentinel_means_no_brick() {
        let msg = WireMessage::state_sync(0.0, Vector2::new(1.0, 2.0), None);
        assert_eq!(msg.destroyed_brick(), None);

        let msg = WireMessage::state_sync(0.0, Vector2::new(1.0, 2.0), Some(Vector2::new(2.0, 70.0)));
        assert_eq!(msg.destroyed_brick(), Some(Vector2::new(2.0, 70.0)));

        assert_eq!(WireMessage::GameEnd { won: false }.destroyed_brick(), None);
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut stream = Vec::new();
        write_message(&mut stream, &WireMessage::CountdownTick { tick: 0 }).unwrap();
        write_message(&mut stream, &WireMessage::Started { started: true }).unwrap();
        write_message(&mut stream, &WireMessage::GameEnd { won: false }).unwrap();

        let mut reader = stream.as_slice();
        assert_eq!(
            read_message(&mut reader).unwrap(),
            WireMessage::CountdownTick { tick: 0 }
        );
        assert_eq!(
            read_message(&mut reader).unwrap(),
            WireMessage::Started { started: true }
        );
        assert_eq!(
            read_message(&mut reader).unwrap(),
            WireMessage::GameEnd { won: false }
        );
        assert!(reader.is_empty());
    }

    #[test]
    fn test_unknown_discriminator_is_protocol_violation() {
        let err = decode(&[0, 0, 0, 4, 1]).unwrap_err();
        assert!(matches!(err, CodecError::Protocol(_)), "got {err:?}");
    }

    #[test]
    fn test_bad_bool_is_protocol_violation() {
        let err = decode(&[0, 0, 0, 1, 7]).unwrap_err();
        assert!(matches!(err, CodecError::Protocol(_)), "got {err:?}");
    }

    #[test]
    fn test_truncated_frame_is_transport_error() {
        let bytes = encode(&WireMessage::CountdownTick { tick: 2 }).unwrap();
        let err = decode(&bytes[..6]).unwrap_err();
        match err {
            CodecError::Transport(io) => assert_eq!(io.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
