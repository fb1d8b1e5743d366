// Countdown driven by the coordinator: N, N-1, ..., 0, then one start message

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::game::MatchPhase;

use super::link::{lock_state, LinkError, LinkState, MessageSink};
use super::protocol::WireMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Idle,
    Ticking(i32),
    Started,
}

#[derive(Debug, Clone)]
pub struct CountdownCoordinator {
    from: i32,
    interval: Duration,
    stage: Stage,
}

impl CountdownCoordinator {
    pub fn new(from: i32, interval: Duration) -> Self {
        Self {
            from: from.max(0),
            interval,
            stage: Stage::Idle,
        }
    }

    /// Advance the state machine and return the message to send, or `None`
    /// once the start message has gone out.
    pub fn next_message(&mut self) -> Option<WireMessage> {
        let (stage, msg) = match self.stage {
            Stage::Idle => (
                Stage::Ticking(self.from),
                WireMessage::CountdownTick { tick: self.from },
            ),
            Stage::Ticking(0) => (Stage::Started, WireMessage::Started { started: true }),
            Stage::Ticking(n) => (
                Stage::Ticking(n - 1),
                WireMessage::CountdownTick { tick: n - 1 },
            ),
            Stage::Started => return None,
        };
        self.stage = stage;
        Some(msg)
    }

    /// Send the whole countdown, waiting `interval` after every tick, and
    /// move the local phase to `Playing` once the start message is sent.
    ///
    /// Returns `Ok(false)` if the match ended or the link closed before the
    /// countdown completed.
    pub fn run<S: MessageSink>(
        &mut self,
        sink: &S,
        state: &Mutex<LinkState>,
    ) -> Result<bool, LinkError> {
        info!(from = self.from, interval_ms = self.interval.as_millis() as u64, "countdown");

        while let Some(msg) = self.next_message() {
            if lock_state(state).phase.is_terminal() {
                debug!("countdown abandoned");
                return Ok(false);
            }

            sink.send(&msg)?;

            let mut shared = lock_state(state);
            match msg {
                WireMessage::CountdownTick { tick } => {
                    if shared.phase.is_terminal() {
                        debug!(tick, "countdown abandoned");
                        return Ok(false);
                    }
                    shared.phase = MatchPhase::Countdown;
                    shared.countdown = Some(tick);
                    drop(shared);
                    debug!(tick, "countdown tick sent");
                    if !self.interval.is_zero() {
                        thread::sleep(self.interval);
                    }
                }
                _ => {
                    if shared.phase.is_terminal() {
                        return Ok(false);
                    }
                    shared.phase = MatchPhase::Playing;
                    shared.countdown = None;
                    info!("match started");
                }
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::game::{GameState, Outcome};
    use crate::network::link::RemoteMirror;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        sent: RefCell<Vec<WireMessage>>,
        fail_after: Option<usize>,
    }

    impl MessageSink for RecordingSink {
        fn send(&self, msg: &WireMessage) -> Result<(), LinkError> {
            let mut sent = self.sent.borrow_mut();
            if self.fail_after.is_some_and(|limit| sent.len() >= limit) {
                return Err(LinkError::Closed);
            }
            sent.push(*msg);
            Ok(())
        }
    }

    fn shared_state() -> Mutex<LinkState> {
        let game = GameState::new(&Config::default(), 5);
        Mutex::new(LinkState::new(RemoteMirror::new(
            game.paddle.x,
            game.ball.position,
            game.bricks.clone(),
        )))
    }

    #[test]
    fn test_sequence() {
        let mut countdown = CountdownCoordinator::new(3, Duration::ZERO);
        let messages: Vec<_> = std::iter::from_fn(|| countdown.next_message()).collect();

        assert_eq!(
            messages,
            vec![
                WireMessage::CountdownTick { tick: 3 },
                WireMessage::CountdownTick { tick: 2 },
                WireMessage::CountdownTick { tick: 1 },
                WireMessage::CountdownTick { tick: 0 },
                WireMessage::Started { started: true },
            ]
        );
        assert_eq!(countdown.next_message(), None);
    }

    #[test]
    fn test_run_sends_once_and_starts() {
        let sink = RecordingSink::default();
        let state = shared_state();
        let mut countdown = CountdownCoordinator::new(3, Duration::ZERO);

        assert!(countdown.run(&sink, &state).unwrap());

        let sent = sink.sent.borrow();
        assert_eq!(sent.len(), 5);
        assert_eq!(
            sent.iter()
                .filter(|msg| matches!(msg, WireMessage::Started { .. }))
                .count(),
            1
        );
        assert_eq!(lock_state(&state).phase, MatchPhase::Playing);
        assert_eq!(lock_state(&state).countdown, None);
    }

    #[test]
    fn test_run_stops_on_send_failure() {
        let sink = RecordingSink {
            fail_after: Some(2),
            ..Default::default()
        };
        let state = shared_state();
        let mut countdown = CountdownCoordinator::new(3, Duration::ZERO);

        assert!(matches!(countdown.run(&sink, &state), Err(LinkError::Closed)));
        assert_eq!(sink.sent.borrow().len(), 2);
        assert_ne!(lock_state(&state).phase, MatchPhase::Playing);
    }

    #[test]
    fn test_run_abandoned_after_match_end() {
        let sink = RecordingSink::default();
        let state = shared_state();
        lock_state(&state).finish(Outcome::Won);

        let mut countdown = CountdownCoordinator::new(3, Duration::ZERO);
        assert!(!countdown.run(&sink, &state).unwrap());
        assert!(sink.sent.borrow().is_empty());
        assert_eq!(lock_state(&state).phase, MatchPhase::Won);
    }

    /// Closes the link while the first tick is in flight, then fails every
    /// later send the way a dead `LinkSender` does.
    struct HangupSink<'a> {
        state: &'a Mutex<LinkState>,
        sent: RefCell<usize>,
    }

    impl MessageSink for HangupSink<'_> {
        fn send(&self, _msg: &WireMessage) -> Result<(), LinkError> {
            let mut sent = self.sent.borrow_mut();
            if *sent > 0 {
                return Err(LinkError::Closed);
            }
            *sent += 1;
            lock_state(self.state).close();
            Ok(())
        }
    }

    #[test]
    fn test_run_keeps_close_during_tick() {
        let state = shared_state();
        lock_state(&state).phase = MatchPhase::Countdown;
        let sink = HangupSink {
            state: &state,
            sent: RefCell::new(0),
        };

        let mut countdown = CountdownCoordinator::new(3, Duration::ZERO);
        assert!(!countdown.run(&sink, &state).unwrap());

        assert_eq!(*sink.sent.borrow(), 1);
        assert_eq!(lock_state(&state).phase, MatchPhase::Closed);
    }
}
