// Terminal frontend: crossterm events in, ratatui frames out

use std::io;
use std::time::Duration;

use ratatui::{backend::Backend, Terminal};

use crate::config::{Config, DisplayConfig};
use crate::game::{poll_input, InputAction};
use crate::game_modes::{Frontend, FrontendInput, Snapshot};

use super::render::{render, BoardViewport};

pub struct TerminalFrontend<B: Backend> {
    terminal: Terminal<B>,
    display: DisplayConfig,
    keyboard_step: f64,
    board_width: f64,
    /// Where the local board was last drawn
    viewport: BoardViewport,
}

impl<B: Backend> TerminalFrontend<B> {
    pub fn new(terminal: Terminal<B>, config: &Config) -> Self {
        Self {
            terminal,
            display: config.display.clone(),
            keyboard_step: config.input.keyboard_step,
            board_width: config.board.width,
            viewport: BoardViewport::default(),
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

/// Reduce raw actions to one input. Pointer columns become board x using the
/// last drawn viewport.
pub fn collect_input(
    actions: &[InputAction],
    viewport: BoardViewport,
    keyboard_step: f64,
    board_width: f64,
) -> FrontendInput {
    let mut input = FrontendInput::default();
    for action in actions {
        match *action {
            InputAction::Quit => input.quit = true,
            InputAction::Start => input.start_requested = true,
            InputAction::PointerMoved { column } => {
                if let Some(x) = viewport.board_x(column, board_width) {
                    input.pointer_x = Some(x);
                }
            }
            InputAction::NudgeLeft => input.nudge -= keyboard_step,
            InputAction::NudgeRight => input.nudge += keyboard_step,
        }
    }
    input
}

impl<B: Backend> Frontend for TerminalFrontend<B> {
    fn poll(&mut self, timeout: Duration) -> io::Result<FrontendInput> {
        let actions = poll_input(timeout)?;
        Ok(collect_input(
            &actions,
            self.viewport,
            self.keyboard_step,
            self.board_width,
        ))
    }

    fn present(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let display = &self.display;
        let mut viewport = self.viewport;
        self.terminal
            .draw(|frame| viewport = render(frame, snapshot, display))?;
        self.viewport = viewport;
        Ok(())
    }
}
