// Configuration file loading and creation

use super::types::Config;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Get the path to the configuration file
pub fn get_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("breakout-duel");

    // Create config directory if it doesn't exist
    fs::create_dir_all(&path).ok();

    path.push("config.toml");
    path
}

/// Load configuration from file, or create default if it doesn't exist
pub fn load_config() -> Result<Config, io::Error> {
    load_config_from(&get_config_path())
}

/// Load configuration from an explicit path, creating it with defaults when missing
pub fn load_config_from(config_path: &Path) -> Result<Config, io::Error> {
    if config_path.exists() {
        let contents = fs::read_to_string(config_path)?;
        Ok(parse_config(&contents))
    } else {
        create_default_config(config_path)?;
        Ok(Config::default())
    }
}

/// Parse TOML contents; malformed files fall back to defaults
pub fn parse_config(contents: &str) -> Config {
    match toml::from_str(contents) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "failed to parse config file, using defaults");
            Config::default()
        }
    }
}

/// Create a default configuration file with helpful comments
pub fn create_default_config(path: &Path) -> Result<(), io::Error> {
    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    // Add helpful header comments
    let commented_toml = format!(
        "# Breakout Duel Configuration File\n\
         # Edit this file to customize game behavior\n\
         # Both peers should use the same [board] and [physics] sections\n\
         #\n\
         # Distances are board units (a board is 400x600 by default)\n\
         # Velocities are board units per tick\n\
         # Colors: RGB values from 0-255\n\n\
         {}",
        toml_string
    );

    fs::write(path, commented_toml)?;
    info!(path = %path.display(), "created default config file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serialization() {
        let config = Config::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        let parsed: Config = toml::from_str(&toml_string).unwrap();

        assert_eq!(parsed.board.width, config.board.width);
        assert_eq!(parsed.board.brick_rows, config.board.brick_rows);
        assert_eq!(
            parsed.physics.paddle_sensitivity,
            config.physics.paddle_sensitivity
        );
        assert_eq!(parsed.timing.tick_ms, config.timing.tick_ms);
        assert_eq!(parsed.network.port, config.network.port);
    }

    #[test]
    fn test_partial_config_with_defaults() {
        let partial_toml = r#"
            [physics]
            lives = 5

            [timing]
            tick_ms = 10
        "#;

        let config = parse_config(partial_toml);

        // Custom values
        assert_eq!(config.physics.lives, 5);
        assert_eq!(config.timing.tick_ms, 10);

        // Default values should still be there, including siblings in the same section
        assert_eq!(config.physics.paddle_sensitivity, 8.0);
        assert_eq!(config.timing.countdown_from, 3);
        assert_eq!(config.board.height, 600.0);
        assert_eq!(config.network.port, 6969);
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let config = parse_config("[board\nwidth = ");
        assert_eq!(config.board.width, 400.0);
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = std::env::temp_dir().join(format!("breakout-duel-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.physics.lives, 3);
        assert!(path.exists());

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(reloaded.board.bricks_per_row, 10);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_miss_pause_ticks() {
        let config = Config::default();
        assert_eq!(config.timing.miss_pause_ticks(&config.physics), 285);
    }
}
