use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;

use super::bricks::{BrickGrid, BrickLayout};
use super::turns::TurnTracker;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ball position is the top-left corner of its bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f64,
}

impl Ball {
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.position.x + self.radius, self.position.y + self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Paddle {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Move the left edge to `x`, clamped to `[0, board_width - width]`.
    pub fn set_x(&mut self, x: f64, board_width: f64) {
        let max_x = (board_width - self.width).max(0.0);
        self.x = x.clamp(0.0, max_x);
    }

    /// Centre the paddle under a pointer at `pointer_x`.
    pub fn follow_pointer(&mut self, pointer_x: f64, board_width: f64) {
        self.set_x(pointer_x - self.width / 2.0, board_width);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    /// The opponent's view of the same match.
    pub fn inverse(self) -> Self {
        match self {
            Outcome::Won => Outcome::Lost,
            Outcome::Lost => Outcome::Won,
        }
    }

    pub fn is_win(self) -> bool {
        self == Outcome::Won
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    WaitingForPeer,
    Countdown,
    Playing,
    Won,
    Lost,
    Closed,
}

impl MatchPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchPhase::Won | MatchPhase::Lost | MatchPhase::Closed)
    }
}

impl From<Outcome> for MatchPhase {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => MatchPhase::Won,
            Outcome::Lost => MatchPhase::Lost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchState {
    pub lives_remaining: u32,
    pub alive_bricks: usize,
    pub phase: MatchPhase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ServeParams {
    initial_vy: f64,
    vx_min: f64,
    vx_max: f64,
}

/// Local simulation of one board. Owned and mutated by the game loop only.
#[derive(Debug, Clone)]
pub struct GameState {
    pub bounds: Bounds,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    pub turns: TurnTracker,
    pub paddle_sensitivity: f64,
    serve: ServeParams,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: &Config, seed: u64) -> Self {
        let board = &config.board;
        let physics = &config.physics;
        let bounds = Bounds {
            width: board.width,
            height: board.height,
        };

        let paddle = Paddle {
            x: (board.width - board.paddle_width) / 2.0,
            y: board.height - board.paddle_y_offset - board.paddle_height,
            width: board.paddle_width,
            height: board.paddle_height,
        };

        let ball = Ball {
            position: Self::serve_position(bounds, board.ball_radius),
            velocity: Vector2::new(0.0, physics.initial_vy),
            radius: board.ball_radius,
        };

        let mut state = Self {
            bounds,
            ball,
            paddle,
            bricks: BrickGrid::new(BrickLayout::from_config(board)),
            turns: TurnTracker::new(
                physics.lives,
                config.timing.miss_pause_ticks(physics),
            ),
            paddle_sensitivity: physics.paddle_sensitivity,
            serve: ServeParams {
                initial_vy: physics.initial_vy,
                vx_min: physics.vx_min,
                vx_max: physics.vx_max,
            },
            rng: StdRng::seed_from_u64(seed),
        };
        state.ball.velocity.x = state.random_vx();
        state
    }

    fn serve_position(bounds: Bounds, radius: f64) -> Vector2 {
        Vector2::new(bounds.width / 2.0 - radius, bounds.height / 2.0 - radius)
    }

    /// Serve speed from `[vx_min, vx_max)` with a coin-flip sign.
    pub fn random_vx(&mut self) -> f64 {
        let speed = if self.serve.vx_max > self.serve.vx_min {
            self.rng.gen_range(self.serve.vx_min..self.serve.vx_max)
        } else {
            self.serve.vx_min
        };
        if self.rng.gen_bool(0.5) {
            -speed
        } else {
            speed
        }
    }

    /// Put the ball back in the middle of the board heading down.
    pub fn reset_ball(&mut self) {
        self.ball.position = Self::serve_position(self.bounds, self.ball.radius);
        let vy = if self.ball.velocity.y == 0.0 {
            self.serve.initial_vy
        } else {
            self.ball.velocity.y
        };
        self.ball.velocity.y = vy.abs();
        self.ball.velocity.x = self.random_vx();
    }

    pub fn move_paddle_to(&mut self, pointer_x: f64) {
        self.paddle.follow_pointer(pointer_x, self.bounds.width);
    }

    pub fn nudge_paddle(&mut self, dx: f64) {
        self.paddle.set_x(self.paddle.x + dx, self.bounds.width);
    }

    pub fn is_over(&self) -> bool {
        self.turns.is_over(self.bricks.alive_count())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.turns.outcome(self.bricks.alive_count())
    }

    pub fn match_state(&self, phase: MatchPhase) -> MatchState {
        MatchState {
            lives_remaining: self.turns.lives_remaining(),
            alive_bricks: self.bricks.alive_count(),
            phase,
        }
    }
}
