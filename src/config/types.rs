// Breakout Duel configuration types
// Defaults reproduce the classic 400x600 board with a 10x10 brick wall

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    // Board dimensions in board units (one board per player)
    pub width: f64,
    pub height: f64,

    // Brick wall layout
    pub brick_rows: usize,
    pub bricks_per_row: usize,
    pub brick_height: f64,
    pub brick_separation: f64,
    pub brick_y_offset: f64,

    // Paddle sits paddle_y_offset above the bottom edge
    pub paddle_width: f64,
    pub paddle_height: f64,
    pub paddle_y_offset: f64,

    pub ball_radius: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
            brick_rows: 10,
            bricks_per_row: 10,
            brick_height: 8.0,
            brick_separation: 4.0,
            brick_y_offset: 70.0,
            paddle_width: 60.0,
            paddle_height: 10.0,
            paddle_y_offset: 30.0,
            ball_radius: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // Vertical speed of a freshly served ball, units per tick
    pub initial_vy: f64,

    // Horizontal serve speed is drawn from [vx_min, vx_max) with a random sign
    pub vx_min: f64,
    pub vx_max: f64,

    // Offset from paddle centre is divided by this to get the kick vx
    pub paddle_sensitivity: f64,

    pub lives: u32,

    // Pause before a re-served ball starts moving
    pub miss_pause_ms: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            initial_vy: 3.0,
            vx_min: 1.0,
            vx_max: 3.0,
            paddle_sensitivity: 8.0,
            lives: 3,
            miss_pause_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    // Game loop tick interval (best effort)
    pub tick_ms: u64,

    // Countdown announced by the accepting peer before play starts
    pub countdown_from: i32,
    pub countdown_interval_ms: u64,

    // Skip the host's "press Enter to start" gate
    pub auto_start: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 7,
            countdown_from: 3,
            countdown_interval_ms: 1000,
            auto_start: false,
        }
    }
}

impl TimingConfig {
    /// Number of ticks the ball is held after a miss.
    pub fn miss_pause_ticks(&self, physics: &PhysicsConfig) -> u32 {
        if self.tick_ms == 0 {
            return 0;
        }
        (physics.miss_pause_ms / self.tick_ms) as u32
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    // Address the listening peer binds to
    pub bind_address: String,

    // Port used by --listen and by --connect when none is given
    pub port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 6969,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    // Paddle movement per Left/Right key press, board units
    pub keyboard_step: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            keyboard_step: 20.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    // Board drawing color (RGB values 0-255)
    pub board_color: [u8; 3],

    // Header text color
    pub hud_color: [u8; 3],

    // Separator between the two boards
    pub separator_color: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            board_color: [255, 255, 255],
            hud_color: [255, 165, 0],
            separator_color: [100, 100, 100],
        }
    }
}
