use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    /// Start the countdown (host) or dismiss a result screen
    Start,
    /// Pointer moved to this terminal column
    PointerMoved { column: u16 },
    NudgeLeft,
    NudgeRight,
}

/// Drain pending terminal events and translate them into actions.
pub fn poll_input(timeout: Duration) -> Result<Vec<InputAction>, std::io::Error> {
    let mut actions = Vec::new();

    let mut wait = timeout;
    while event::poll(wait)? {
        wait = Duration::ZERO;
        if let Some(action) = translate(event::read()?) {
            actions.push(action);
        }
    }

    Ok(actions)
}

fn translate(event: Event) -> Option<InputAction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputAction::Quit),
            KeyCode::Enter | KeyCode::Char(' ') => Some(InputAction::Start),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(InputAction::NudgeLeft)
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(InputAction::NudgeRight)
            }
            _ => None,
        },
        Event::Mouse(MouseEvent { kind, column, .. }) => match kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                Some(InputAction::PointerMoved { column })
            }
            MouseEventKind::Down(MouseButton::Left) => Some(InputAction::Start),
            _ => None,
        },
        _ => None,
    }
}
