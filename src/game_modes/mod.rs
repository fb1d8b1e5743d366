pub mod common;
mod local;
mod network;

pub use common::{Frontend, FrontendInput, LoopExit, Snapshot};
pub use local::run_game_local;
pub use network::run_game_network;
