use std::io;

use anyhow::{bail, Context};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use breakout_duel::config::{self, Config};
use breakout_duel::debug;
use breakout_duel::game::Outcome;
use breakout_duel::game_modes::{run_game_local, run_game_network};
use breakout_duel::network::transport::{establish, with_default_port};
use breakout_duel::network::ConnectionMode;
use breakout_duel::ui::TerminalFrontend;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Single-board practice
    Practice,
    /// Wait for an opponent; `None` uses the configured port
    Listen { port: Option<u16> },
    /// Connect to a waiting opponent, `HOST[:PORT]`
    Connect { target: String },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    command: Command,
    seed: Option<u64>,
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let raw: Vec<String> = std::env::args().collect();
    let program = raw.first().map(String::as_str).unwrap_or("breakout-duel");

    let args = match parse_args(raw.get(1..).unwrap_or_default()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {err}");
            print_usage(program);
            std::process::exit(1);
        }
    };
    if args.command == Command::Help {
        print_usage(program);
        return Ok(());
    }

    debug::init(args.debug)?;
    let config = config::load_config().context("failed to load config")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(command = ?args.command, seed, "starting");

    // Connect before the TUI takes over the terminal
    let connection = match &args.command {
        Command::Listen { port } => {
            let port = port.unwrap_or(config.network.port);
            eprintln!("Waiting for an opponent on port {port}...");
            let mode = ConnectionMode::Listen {
                bind: config.network.bind_address.clone(),
                port,
            };
            Some(establish(&mode).context("no opponent connected")?)
        }
        Command::Connect { target } => {
            let addr = with_default_port(target, config.network.port);
            eprintln!("Connecting to {addr}...");
            let mode = ConnectionMode::Connect { addr: addr.clone() };
            Some(establish(&mode).with_context(|| format!("could not connect to {addr}"))?)
        }
        Command::Practice | Command::Help => None,
    };

    let outcome = run_tui(&config, connection, seed)?;

    match outcome {
        Some(Outcome::Won) => println!("You won!"),
        Some(Outcome::Lost) => println!("You lost."),
        None => println!("Match ended without a result."),
    }
    Ok(())
}

fn run_tui(
    config: &Config,
    connection: Option<(std::net::TcpStream, breakout_duel::network::Role)>,
    seed: u64,
) -> anyhow::Result<Option<Outcome>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let mut frontend = TerminalFrontend::new(terminal, config);

    let result = match connection {
        Some((stream, role)) => run_game_network(&mut frontend, config, stream, role, seed),
        None => run_game_local(&mut frontend, config, seed),
    };

    // Restore terminal even if the game failed
    disable_raw_mode()?;
    let terminal = frontend.terminal_mut();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.context("game aborted")
}

/// Parse command line arguments (program name already stripped)
fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut parsed = Args {
        command: Command::Practice,
        seed: None,
        debug: false,
    };
    let mut mode_given = false;
    let mut set_mode = |parsed: &mut Args, command: Command| -> anyhow::Result<()> {
        if mode_given {
            bail!("choose only one of --listen, --connect and --local");
        }
        mode_given = true;
        parsed.command = command;
        Ok(())
    };

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--listen" | "-l" => {
                // Optional port
                let port = match iter.next_if(|next| !next.starts_with('-')) {
                    Some(value) => Some(
                        value
                            .parse::<u16>()
                            .with_context(|| format!("invalid port: {value}"))?,
                    ),
                    None => None,
                };
                set_mode(&mut parsed, Command::Listen { port })?;
            }
            "--connect" | "-c" => {
                let Some(target) = iter.next() else {
                    bail!("--connect requires HOST[:PORT]");
                };
                set_mode(
                    &mut parsed,
                    Command::Connect {
                        target: target.clone(),
                    },
                )?;
            }
            "--local" => set_mode(&mut parsed, Command::Practice)?,
            "--seed" => {
                let Some(value) = iter.next() else {
                    bail!("--seed requires a number");
                };
                parsed.seed = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid seed: {value}"))?,
                );
            }
            "--debug" | "-d" => parsed.debug = true,
            "--help" | "-h" => {
                parsed.command = Command::Help;
                return Ok(parsed);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(parsed)
}

fn print_usage(program: &str) {
    println!("Breakout Duel - two-player networked Breakout in the terminal");
    println!();
    println!("Usage:");
    println!("  {program}                          # Practice on your own");
    println!("  {program} --listen [PORT]          # Host a match (default port 6969)");
    println!("  {program} --connect HOST[:PORT]    # Join a hosted match");
    println!();
    println!("Options:");
    println!("  --local       Practice mode (same as no mode)");
    println!("  --seed N      Seed for the serve direction");
    println!("  --debug       Log to {}", debug::LOG_FILE_PATH);
    println!("  --help        Show this message");
    println!();
    println!("Controls: move the mouse or use ←/→, Enter or click to start, Q to quit.");
    println!("Config: {}", config::get_config_path().display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_is_practice() {
        let parsed = parse_args(&[]).unwrap();
        assert_eq!(parsed.command, Command::Practice);
        assert_eq!(parsed.seed, None);
        assert!(!parsed.debug);
    }

    #[test]
    fn test_listen_with_and_without_port() {
        let parsed = parse_args(&args(&["--listen"])).unwrap();
        assert_eq!(parsed.command, Command::Listen { port: None });

        let parsed = parse_args(&args(&["--listen", "7000", "--debug"])).unwrap();
        assert_eq!(parsed.command, Command::Listen { port: Some(7000) });
        assert!(parsed.debug);

        assert!(parse_args(&args(&["--listen", "seventy"])).is_err());
    }

    #[test]
    fn test_connect_and_seed() {
        let parsed = parse_args(&args(&["--seed", "42", "--connect", "10.0.0.5"])).unwrap();
        assert_eq!(
            parsed.command,
            Command::Connect {
                target: "10.0.0.5".into()
            }
        );
        assert_eq!(parsed.seed, Some(42));

        assert!(parse_args(&args(&["--connect"])).is_err());
    }

    #[test]
    fn test_conflicting_modes_rejected() {
        assert!(parse_args(&args(&["--listen", "--connect", "host"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert_eq!(
            parse_args(&args(&["--help"])).unwrap().command,
            Command::Help
        );
    }
}
