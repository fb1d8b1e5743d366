pub mod bricks;
pub mod input;
pub mod physics;
pub mod state;
pub mod turns;

pub use bricks::{Brick, BrickGrid, BrickId, BrickLayout};
pub use input::{poll_input, InputAction};
pub use physics::{update, TickEvents};
pub use state::{
    Ball, Bounds, GameState, MatchPhase, MatchState, Outcome, Paddle, Vector2,
};
pub use turns::TurnTracker;
