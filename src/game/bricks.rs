//! Destructible brick wall.
//!
//! Bricks are laid out once at game start and only ever go from alive to dead.
//! The grid keeps its alive count in step with every destruction so callers
//! never have to recount.

use crate::config::BoardConfig;

use super::state::Vector2;

/// Grid coordinates of a brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrickId {
    pub row: usize,
    pub col: usize,
}

impl BrickId {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brick {
    pub row: usize,
    pub col: usize,
    pub alive: bool,
}

/// Geometry of the wall in board units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickLayout {
    pub rows: usize,
    pub cols: usize,
    pub brick_width: f64,
    pub brick_height: f64,
    pub separation: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl BrickLayout {
    /// Bricks span the board width (whole-unit brick width) and the leftover
    /// space is split evenly on both sides.
    pub fn from_config(board: &BoardConfig) -> Self {
        let cols = board.bricks_per_row.max(1);
        let gaps = (cols - 1) as f64 * board.brick_separation;
        let brick_width = ((board.width - gaps) / cols as f64).floor();
        let x_offset = ((board.width - cols as f64 * brick_width - gaps) / 2.0).floor();

        Self {
            rows: board.brick_rows,
            cols,
            brick_width,
            brick_height: board.brick_height,
            separation: board.brick_separation,
            x_offset,
            y_offset: board.brick_y_offset,
        }
    }

    /// Top-left corner of a brick.
    pub fn origin(&self, id: BrickId) -> Vector2 {
        Vector2::new(
            self.x_offset + id.col as f64 * (self.brick_width + self.separation),
            self.y_offset + id.row as f64 * (self.brick_height + self.separation),
        )
    }

    /// Cell whose rectangle `[x, x+w) x [y, y+h)` contains `point`, if any.
    /// Points in the separation gaps belong to no cell.
    pub fn cell_at(&self, point: Vector2) -> Option<BrickId> {
        let col = Self::axis_index(
            point.x - self.x_offset,
            self.brick_width,
            self.separation,
            self.cols,
        )?;
        let row = Self::axis_index(
            point.y - self.y_offset,
            self.brick_height,
            self.separation,
            self.rows,
        )?;
        Some(BrickId::new(row, col))
    }

    fn axis_index(offset: f64, size: f64, separation: f64, count: usize) -> Option<usize> {
        if !offset.is_finite() || offset < 0.0 {
            return None;
        }
        let pitch = size + separation;
        let index = (offset / pitch).floor() as usize;
        if index >= count || offset - index as f64 * pitch >= size {
            return None;
        }
        Some(index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrickGrid {
    layout: BrickLayout,
    bricks: Vec<Brick>,
    alive_count: usize,
}

impl BrickGrid {
    /// A full wall with every brick alive.
    pub fn new(layout: BrickLayout) -> Self {
        let bricks: Vec<Brick> = (0..layout.rows)
            .flat_map(|row| {
                (0..layout.cols).map(move |col| Brick {
                    row,
                    col,
                    alive: true,
                })
            })
            .collect();
        let alive_count = bricks.len();

        Self {
            layout,
            bricks,
            alive_count,
        }
    }

    pub fn layout(&self) -> &BrickLayout {
        &self.layout
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub fn get(&self, id: BrickId) -> Option<&Brick> {
        self.index(id).map(|index| &self.bricks[index])
    }

    pub fn is_alive(&self, id: BrickId) -> bool {
        self.get(id).is_some_and(|brick| brick.alive)
    }

    /// Live brick covering `point`.
    pub fn alive_at(&self, point: Vector2) -> Option<BrickId> {
        self.layout
            .cell_at(point)
            .filter(|&id| self.is_alive(id))
    }

    /// Kill a brick. Returns `true` only on the alive -> dead transition;
    /// destroying a dead or out-of-range brick changes nothing.
    pub fn destroy(&mut self, id: BrickId) -> bool {
        let Some(index) = self.index(id) else {
            return false;
        };
        let brick = &mut self.bricks[index];
        if !brick.alive {
            return false;
        }
        brick.alive = false;
        self.alive_count -= 1;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    fn index(&self, id: BrickId) -> Option<usize> {
        (id.row < self.layout.rows && id.col < self.layout.cols)
            .then(|| id.row * self.layout.cols + id.col)
    }
}
