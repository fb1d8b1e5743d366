use std::io;
use std::net::TcpStream;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::game::{GameState, MatchPhase, Outcome};
use crate::network::{CountdownCoordinator, LinkState, PeerLink, RemoteMirror, Role};

use super::common::{run_game_loop, Frontend, Snapshot};

const WAIT_POLL: Duration = Duration::from_millis(20);

fn waiting_snapshot<'a>(
    game: &'a GameState,
    state: &'a LinkState,
    awaiting_start: bool,
) -> Snapshot<'a> {
    Snapshot {
        game,
        phase: state.phase,
        outcome: state.outcome,
        countdown: state.countdown,
        opponent: Some(&state.mirror),
        awaiting_start,
    }
}

/// Host only: hold the countdown until the player asks to start.
/// Returns `false` if the player quit or the opponent left first.
fn wait_for_start<F: Frontend>(
    frontend: &mut F,
    game: &GameState,
    link: &PeerLink,
) -> io::Result<bool> {
    loop {
        let state = link.snapshot();
        if state.phase.is_terminal() {
            return Ok(false);
        }
        frontend.present(&waiting_snapshot(game, &state, true))?;

        let input = frontend.poll(WAIT_POLL)?;
        if input.quit {
            return Ok(false);
        }
        if input.start_requested {
            return Ok(true);
        }
    }
}

/// Show the countdown until the match is live. Returns `false` if the player
/// quit or the link ended before play began.
fn wait_until_playing<F: Frontend>(
    frontend: &mut F,
    game: &GameState,
    link: &PeerLink,
) -> io::Result<bool> {
    loop {
        let state = link.snapshot();
        match state.phase {
            MatchPhase::Playing => return Ok(true),
            phase if phase.is_terminal() => {
                debug!(?phase, "match over before it started");
                return Ok(false);
            }
            _ => {}
        }
        frontend.present(&waiting_snapshot(game, &state, false))?;

        if frontend.poll(WAIT_POLL)?.quit {
            return Ok(false);
        }
    }
}

/// Keep the final board on screen until the player dismisses it.
fn show_result<F: Frontend>(frontend: &mut F, game: &GameState, link: &PeerLink) -> io::Result<()> {
    loop {
        let state = link.snapshot();
        frontend.present(&waiting_snapshot(game, &state, false))?;

        let input = frontend.poll(WAIT_POLL)?;
        if input.quit || input.start_requested {
            return Ok(());
        }
    }
}

fn spawn_countdown(link: &PeerLink, config: &Config) -> io::Result<JoinHandle<()>> {
    let sender = link.sender();
    let state = link.state();
    let mut countdown = CountdownCoordinator::new(
        config.timing.countdown_from,
        Duration::from_millis(config.timing.countdown_interval_ms),
    );

    thread::Builder::new()
        .name("countdown".to_string())
        .spawn(move || match countdown.run(&sender, &state) {
            Ok(true) => {}
            Ok(false) => debug!("countdown did not finish"),
            Err(err) => warn!(error = %err, "countdown aborted"),
        })
}

/// Play one match over an established connection.
///
/// Both peers build their own board and the opponent mirror from the same
/// seed. The coordinator runs the countdown, the follower waits for it.
pub fn run_game_network<F: Frontend>(
    frontend: &mut F,
    config: &Config,
    stream: TcpStream,
    role: Role,
    seed: u64,
) -> io::Result<Option<Outcome>> {
    info!(?role, seed, "network match");

    let mut game = GameState::new(config, seed);
    let opponent = GameState::new(config, seed);
    let mirror = RemoteMirror::new(opponent.paddle.x, opponent.ball.position, opponent.bricks);

    let mut link = PeerLink::open(stream, role, mirror).map_err(io::Error::other)?;

    let mut countdown = None;
    let ready = match link.role() {
        Role::Coordinator => {
            let start = config.timing.auto_start || wait_for_start(frontend, &game, &link)?;
            if start {
                countdown = Some(spawn_countdown(&link, config)?);
            }
            start
        }
        Role::Follower => true,
    };

    let mut outcome = None;
    if ready && wait_until_playing(frontend, &game, &link)? {
        let exit = run_game_loop(
            &mut game,
            Some(&link),
            frontend,
            Duration::from_millis(config.timing.tick_ms),
        )?;
        outcome = exit.outcome;
        info!(?outcome, quit = exit.quit, "match finished");

        if !exit.quit {
            show_result(frontend, &game, &link)?;
        }
    }

    link.shutdown();
    if let Some(handle) = countdown {
        if handle.join().is_err() {
            warn!("countdown thread panicked");
        }
    }

    Ok(outcome.or(link.snapshot().outcome))
}
