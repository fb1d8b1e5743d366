//! Pieces shared by the practice and networked modes
//!
//! The game loop only talks to the outside world through [`Frontend`]: it asks
//! for input once per tick and hands back a [`Snapshot`] to draw.

use std::io;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::game::{self, GameState, MatchPhase, MatchState, Outcome};
use crate::network::{lock_state, PeerLink, RemoteMirror, WireMessage};

/// Input gathered since the last poll, already in board coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrontendInput {
    /// Pointer position on the local board, if it moved
    pub pointer_x: Option<f64>,
    /// Keyboard paddle movement in board units
    pub nudge: f64,
    pub start_requested: bool,
    pub quit: bool,
}

/// Everything a frontend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub game: &'a GameState,
    pub phase: MatchPhase,
    pub outcome: Option<Outcome>,
    pub countdown: Option<i32>,
    /// Opponent board; `None` in practice mode
    pub opponent: Option<&'a RemoteMirror>,
    /// Host is waiting for the player to start the countdown
    pub awaiting_start: bool,
}

impl<'a> Snapshot<'a> {
    pub fn practice(game: &'a GameState, phase: MatchPhase) -> Self {
        Self {
            game,
            phase,
            outcome: game.outcome(),
            countdown: None,
            opponent: None,
            awaiting_start: false,
        }
    }

    pub fn match_state(&self) -> MatchState {
        self.game.match_state(self.phase)
    }
}

pub trait Frontend {
    /// Collect input, waiting at most `timeout` for the first event.
    fn poll(&mut self, timeout: Duration) -> io::Result<FrontendInput>;

    fn present(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()>;
}

/// How the game loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopExit {
    /// `None` when the link closed before anyone won
    pub outcome: Option<Outcome>,
    /// Player asked to leave
    pub quit: bool,
}

/// Sleep away whatever is left of the current tick.
pub fn limit_tick_rate(tick_start: Instant, tick: Duration) {
    let elapsed = tick_start.elapsed();
    if elapsed < tick {
        std::thread::sleep(tick - elapsed);
    }
}

pub fn apply_input(game: &mut GameState, input: &FrontendInput) {
    if let Some(x) = input.pointer_x {
        game.move_paddle_to(x);
    }
    if input.nudge != 0.0 {
        game.nudge_paddle(input.nudge);
    }
}

/// Run the local board until it is decided, the player quits or the link
/// closes. With a link, every tick is mirrored to the opponent and the local
/// result is sent exactly once on the way out.
pub fn run_game_loop<F: Frontend>(
    game: &mut GameState,
    link: Option<&PeerLink>,
    frontend: &mut F,
    tick: Duration,
) -> io::Result<LoopExit> {
    let mut quit = false;
    let mut ticks: u64 = 0;

    loop {
        let tick_start = Instant::now();

        let input = frontend.poll(Duration::ZERO)?;
        if input.quit {
            info!(ticks, "player quit");
            quit = true;
            break;
        }
        apply_input(game, &input);

        if let Some(link) = link {
            let phase = link.phase();
            if phase != MatchPhase::Playing {
                debug!(?phase, ticks, "match ended remotely");
                break;
            }
        }

        let events = game::update(game);
        ticks += 1;

        if let Some(id) = events.destroyed {
            debug!(
                row = id.row,
                col = id.col,
                remaining = game.bricks.alive_count(),
                "brick destroyed"
            );
        }
        if events.missed {
            info!(lives = game.turns.lives_remaining(), "ball missed");
        }

        match link {
            Some(link) => {
                let corner = events.destroyed.map(|id| game.bricks.layout().origin(id));
                let msg = WireMessage::state_sync(game.paddle.x, game.ball.position, corner);
                if let Err(err) = link.send(&msg) {
                    warn!(error = %err, ticks, "state sync failed");
                    break;
                }
                let state = link.snapshot();
                frontend.present(&Snapshot {
                    game,
                    phase: state.phase,
                    outcome: state.outcome,
                    countdown: None,
                    opponent: Some(&state.mirror),
                    awaiting_start: false,
                })?;
            }
            None => frontend.present(&Snapshot::practice(game, MatchPhase::Playing))?,
        }

        if game.is_over() {
            break;
        }

        limit_tick_rate(tick_start, tick);
    }

    // Quitting mid-match forfeits it
    let local = if quit { Some(Outcome::Lost) } else { game.outcome() };

    let outcome = match link {
        Some(link) => {
            if let Some(result) = local {
                let decided = lock_state(&link.state()).finish(result);
                if decided {
                    info!(?result, ticks, "match decided locally");
                    if let Err(err) = link.send(&WireMessage::GameEnd {
                        won: result.is_win(),
                    }) {
                        warn!(error = %err, "could not report result");
                    }
                }
            }
            link.snapshot().outcome
        }
        None => {
            info!(?local, ticks, "practice over");
            local
        }
    };

    Ok(LoopExit { outcome, quit })
}
