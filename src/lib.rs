//! Two-player networked Breakout.
//!
//! Each peer simulates its own board (ball, paddle, brick grid) on a fixed tick
//! and streams its state to the opponent over one TCP connection. The opponent's
//! board is kept as a read-only mirror updated by a dedicated receive loop.

pub mod config;
pub mod debug;
pub mod game;
pub mod game_modes;
pub mod network;
pub mod ui;
