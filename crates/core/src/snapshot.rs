use serde::Serialize;

use crate::game_state::{LockEvent, Tetromino};
use crate::types::{Cell, Color, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub color: Color,
    /// Clockwise quarter turns from the base layout (0..=3)
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
    /// Absolute (x, y) of each mino; y may be negative above the board
    pub cells: [(i8, i8); 4],
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            color: value.color,
            rotation: value.rotation.index(),
            x: value.x,
            y: value.y,
            cells: value.cells(),
        }
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Locked cells, row-major
    pub cells: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub score: u32,
    pub game_over: bool,
    pub pieces_spawned: u32,
    pub last_lock: Option<LockEvent>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.active = None;
        self.score = 0;
        self.game_over = false;
        self.pieces_spawned = 0;
        self.last_lock = None;
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        self.cells.get(y * self.width as usize + x).copied()
    }

    /// Cell as drawn: the active piece on top of locked cells
    pub fn composed_cell(&self, x: usize, y: usize) -> Option<Cell> {
        let locked = self.cell(x, y)?;
        let covered = self.active.and_then(|a| {
            a.cells
                .iter()
                .any(|&(cx, cy)| cx as isize == x as isize && cy as isize == y as isize)
                .then_some(a.color)
        });
        Some(covered.or(locked))
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}
