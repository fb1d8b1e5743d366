use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::config::DisplayConfig;
use crate::game::{BrickGrid, BrickId, Bounds, Paddle, Vector2};
use crate::game_modes::Snapshot;

use super::braille::BrailleCanvas;
use super::overlay::{render_overlay, OverlayMessage};

// Row 0: lives and bricks for both boards
// Row 1: controls hint
// Remaining rows: local board | separator | opponent board
const UI_HEADER_ROWS: u16 = 2;

/// Terminal columns covered by the local board, used to turn a mouse column
/// into a board x coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardViewport {
    pub x: u16,
    pub width: u16,
}

impl BoardViewport {
    /// Board x under the middle of `column`. Columns outside the board clamp
    /// to its edges.
    pub fn board_x(&self, column: u16, board_width: f64) -> Option<f64> {
        if self.width == 0 {
            return None;
        }
        let offset = column.saturating_sub(self.x).min(self.width - 1);
        Some((f64::from(offset) + 0.5) / f64::from(self.width) * board_width)
    }
}

/// Whatever is needed to draw one board, local or mirrored.
struct BoardView<'a> {
    bounds: Bounds,
    paddle: Paddle,
    ball_position: Vector2,
    ball_diameter: f64,
    bricks: &'a BrickGrid,
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

pub fn render(
    frame: &mut Frame,
    snapshot: &Snapshot<'_>,
    display: &DisplayConfig,
) -> BoardViewport {
    let area = frame.area();

    // Draw background (true black RGB, not terminal default)
    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);

    draw_header(frame, snapshot, display, area);

    let body = Rect {
        x: area.x,
        y: area.y + UI_HEADER_ROWS.min(area.height),
        width: area.width,
        height: area.height.saturating_sub(UI_HEADER_ROWS),
    };

    let game = snapshot.game;
    let local = BoardView {
        bounds: game.bounds,
        paddle: game.paddle,
        ball_position: game.ball.position,
        ball_diameter: game.ball.diameter(),
        bricks: &game.bricks,
    };

    let local_area = match snapshot.opponent {
        Some(mirror) => {
            let half = body.width.saturating_sub(1) / 2;
            let local_area = Rect { width: half, ..body };
            let separator = Rect {
                x: body.x + half,
                width: body.width.min(1),
                ..body
            };
            let opponent_area = Rect {
                x: separator.x + separator.width,
                width: body.width.saturating_sub(half + separator.width),
                ..body
            };

            draw_separator(frame, separator, display);

            // The mirror only carries positions; sizes match the local board
            let mut paddle = game.paddle;
            paddle.x = mirror.paddle_x;
            let opponent = BoardView {
                bounds: game.bounds,
                paddle,
                ball_position: mirror.ball_position,
                ball_diameter: game.ball.diameter(),
                bricks: &mirror.bricks,
            };
            draw_board(frame, &opponent, opponent_area, display);
            local_area
        }
        None => body,
    };
    draw_board(frame, &local, local_area, display);

    if let Some(message) = OverlayMessage::for_snapshot(snapshot) {
        render_overlay(frame, &message, area);
    }

    BoardViewport {
        x: local_area.x,
        width: local_area.width,
    }
}

fn draw_header(
    frame: &mut Frame,
    snapshot: &Snapshot<'_>,
    display: &DisplayConfig,
    area: Rect,
) {
    if area.height < UI_HEADER_ROWS {
        return;
    }
    let style = Style::default().fg(rgb(display.hud_color));
    let state = snapshot.match_state();

    let hearts = "♥".repeat(state.lives_remaining as usize);
    let local = format!(" YOU  lives {:<5} bricks {:>3}", hearts, state.alive_bricks);

    let row = Rect {
        height: 1,
        ..area
    };
    let half = row.width / 2;
    frame.render_widget(
        Paragraph::new(local).style(style),
        Rect { width: half, ..row },
    );

    if let Some(mirror) = snapshot.opponent {
        let opponent = format!("OPPONENT  bricks {:>3} ", mirror.bricks.alive_count());
        frame.render_widget(
            Paragraph::new(opponent)
                .style(style)
                .alignment(Alignment::Right),
            Rect {
                x: row.x + half,
                width: row.width - half,
                ..row
            },
        );
    }

    let controls = Paragraph::new("Mouse or ←/→: paddle   Q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(
        controls,
        Rect {
            y: area.y + 1,
            ..row
        },
    );
}

fn draw_separator(frame: &mut Frame, area: Rect, display: &DisplayConfig) {
    if area.width == 0 {
        return;
    }
    let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);
    canvas.draw_dotted_vertical_line(0);
    render_braille_canvas(frame, &canvas, area, rgb(display.separator_color));
}

fn draw_board(frame: &mut Frame, view: &BoardView<'_>, area: Rect, display: &DisplayConfig) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);
    let scale_x = canvas.pixel_width() as f64 / view.bounds.width;
    let scale_y = canvas.pixel_height() as f64 / view.bounds.height;

    let mut fill = |x: f64, y: f64, w: f64, h: f64| {
        canvas.fill_rect(
            to_pixel(x, scale_x),
            to_pixel(y, scale_y),
            to_extent(w, scale_x),
            to_extent(h, scale_y),
        );
    };

    let layout = view.bricks.layout();
    for brick in view.bricks.iter().filter(|brick| brick.alive) {
        let origin = layout.origin(BrickId::new(brick.row, brick.col));
        fill(origin.x, origin.y, layout.brick_width, layout.brick_height);
    }

    fill(view.paddle.x, view.paddle.y, view.paddle.width, view.paddle.height);
    fill(
        view.ball_position.x,
        view.ball_position.y,
        view.ball_diameter,
        view.ball_diameter,
    );

    // Bottom edge, where balls are lost
    canvas.draw_horizontal_line(canvas.pixel_height().saturating_sub(1));

    render_braille_canvas(frame, &canvas, area, rgb(display.board_color));
}

fn to_pixel(value: f64, scale: f64) -> usize {
    (value * scale).max(0.0) as usize
}

/// Anything on the board stays at least one dot wide
fn to_extent(value: f64, scale: f64) -> usize {
    ((value * scale).round() as usize).max(1)
}

fn render_braille_canvas(frame: &mut Frame, canvas: &BrailleCanvas, area: Rect, color: Color) {
    for y in 0..canvas.height() {
        let paragraph = Paragraph::new(canvas.row_string(y)).style(Style::default().fg(color));

        let row_area = Rect {
            x: area.x,
            y: area.y + y as u16,
            width: area.width,
            height: 1,
        };

        frame.render_widget(paragraph, row_area);
    }
}
