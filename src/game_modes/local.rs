use std::io;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::game::{GameState, MatchPhase, Outcome};

use super::common::{run_game_loop, Frontend, Snapshot};

const RESULT_POLL: Duration = Duration::from_millis(50);

/// Single-board practice game, no networking
pub fn run_game_local<F: Frontend>(
    frontend: &mut F,
    config: &Config,
    seed: u64,
) -> io::Result<Option<Outcome>> {
    info!(seed, "practice mode");

    let mut game = GameState::new(config, seed);
    let exit = run_game_loop(
        &mut game,
        None,
        frontend,
        Duration::from_millis(config.timing.tick_ms),
    )?;

    if !exit.quit {
        let phase = exit.outcome.map_or(MatchPhase::Closed, MatchPhase::from);
        loop {
            frontend.present(&Snapshot::practice(&game, phase))?;
            let input = frontend.poll(RESULT_POLL)?;
            if input.quit || input.start_requested {
                break;
            }
        }
    }

    Ok(exit.outcome)
}
