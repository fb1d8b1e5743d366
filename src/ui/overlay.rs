// Overlay message system for displaying centered text on screen

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::game::{MatchPhase, Outcome};
use crate::game_modes::Snapshot;

/// A message to display as an overlay in the center of the screen
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMessage {
    /// Lines of text to display
    pub lines: Vec<String>,
    /// Optional title for the overlay box
    pub title: Option<String>,
    /// Style preset for the overlay
    pub style: OverlayStyle,
}

/// Predefined styles for overlay messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayStyle {
    Info,
    Warning,
    Error,
    Success,
}

impl OverlayMessage {
    fn styled(style: OverlayStyle, lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            title: None,
            style,
        }
    }

    pub fn info(lines: &[&str]) -> Self {
        Self::styled(OverlayStyle::Info, lines)
    }

    pub fn warning(lines: &[&str]) -> Self {
        Self::styled(OverlayStyle::Warning, lines)
    }

    pub fn error(lines: &[&str]) -> Self {
        Self::styled(OverlayStyle::Error, lines)
    }

    pub fn success(lines: &[&str]) -> Self {
        Self::styled(OverlayStyle::Success, lines)
    }

    /// Set the title for this message
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Message for the current match phase, `None` while playing.
    pub fn for_snapshot(snapshot: &Snapshot<'_>) -> Option<Self> {
        const EXIT_HINT: &str = "Enter or Q to exit";

        if snapshot.awaiting_start {
            return Some(
                Self::info(&["Opponent connected", "", "Enter or click to start", "Q to quit"])
                    .with_title("BREAKOUT DUEL"),
            );
        }

        let message = match (snapshot.phase, snapshot.outcome) {
            (MatchPhase::Playing, _) => return None,
            (MatchPhase::WaitingForPeer, _) => Self::info(&["Waiting for opponent..."]),
            (MatchPhase::Countdown, _) => match snapshot.countdown {
                Some(tick) => Self::info(&[format!("Starting in {tick}").as_str()]),
                None => Self::info(&["Waiting for the host to start..."]),
            },
            (MatchPhase::Won, _) | (MatchPhase::Closed, Some(Outcome::Won)) => {
                Self::success(&["YOU WIN", "", EXIT_HINT])
            }
            (MatchPhase::Lost, _) | (MatchPhase::Closed, Some(Outcome::Lost)) => {
                Self::error(&["YOU LOSE", "", EXIT_HINT])
            }
            (MatchPhase::Closed, None) => {
                Self::warning(&["Connection closed", "", EXIT_HINT])
            }
        };
        Some(message)
    }

    /// Get the color for the border and title based on style
    fn border_color(&self) -> Color {
        match self.style {
            OverlayStyle::Info => Color::Cyan,
            OverlayStyle::Warning => Color::Yellow,
            OverlayStyle::Error => Color::Red,
            OverlayStyle::Success => Color::Green,
        }
    }

    /// Get the color for the message text based on style
    fn text_color(&self) -> Color {
        match self.style {
            OverlayStyle::Info => Color::White,
            OverlayStyle::Warning => Color::Yellow,
            OverlayStyle::Error => Color::LightRed,
            OverlayStyle::Success => Color::LightGreen,
        }
    }
}

/// Render an overlay message in the center of `area`
pub fn render_overlay(frame: &mut Frame, message: &OverlayMessage, area: Rect) {
    let max_line_length = message
        .lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    // Add padding for borders and spacing
    let overlay_width = (max_line_length as u16 + 6).min(area.width.saturating_sub(4));
    let overlay_height = (message.lines.len() as u16 + 4).min(area.height.saturating_sub(4));

    let overlay_area = Rect {
        x: area.x + (area.width.saturating_sub(overlay_width)) / 2,
        y: area.y + (area.height.saturating_sub(overlay_height)) / 2,
        width: overlay_width,
        height: overlay_height,
    };

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(message.border_color()))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));

    if let Some(ref title) = message.title {
        block = block.title(format!(" {} ", title));
    }

    frame.render_widget(block, overlay_area);

    let inner_area = overlay_area.inner(Margin::new(2, 1));

    let text_lines: Vec<Line> = message
        .lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                line.clone(),
                Style::default().fg(message.text_color()),
            ))
        })
        .collect();

    let paragraph = Paragraph::new(text_lines).alignment(Alignment::Center);

    frame.render_widget(paragraph, inner_area);
}
