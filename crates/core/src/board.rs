//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds the
//! color of a locked block. Cells live in one flat, row-major boxed slice that is
//! allocated once; the dimensions never change afterwards.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Rows above the board (y < 0) are legal positions for a piece but hold no cells.

use arrayvec::ArrayVec;

use crate::pieces::MinoOffset;
use crate::types::{Cell, Color, MAX_BOARD_DIM, MIN_BOARD_DIM};

/// Row indices removed by one line clear, bottom to top
pub type ClearedRows = ArrayVec<usize, { MAX_BOARD_DIM as usize }>;

/// The game board using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Box<[Cell]>,
}

impl Board {
    /// Create a new empty board
    ///
    /// Dimensions are clamped to `MIN_BOARD_DIM..=MAX_BOARD_DIM`; use
    /// [`GameConfig::validate`](crate::config::GameConfig::validate) to reject
    /// bad sizes up front.
    pub fn new(width: u8, height: u8) -> Self {
        let width = width.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM);
        let height = height.clamp(MIN_BOARD_DIM, MAX_BOARD_DIM);
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize].into_boxed_slice(),
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and empty
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check whether a piece with `shape` at origin `(x, y)` collides
    ///
    /// A mino collides when it is left of column 0, right of the last column,
    /// at or below row `height`, or on an occupied cell. Minos above the board
    /// (y < 0) are only checked against the side walls.
    pub fn collides(&self, shape: &[MinoOffset], x: i8, y: i8) -> bool {
        shape.iter().any(|&(dx, dy)| {
            let px = x as i16 + dx as i16;
            let py = y as i16 + dy as i16;
            if px < 0 || px >= self.width as i16 || py >= self.height as i16 {
                return true;
            }
            py >= 0 && self.is_occupied(px as i8, py as i8)
        })
    }

    /// Check if a row has no empty cell
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        let width = self.width as usize;
        let start = y * width;
        self.cells[start..start + width].iter().all(|cell| cell.is_some())
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top)
    ///
    /// Remaining rows keep their relative order and settle at the bottom; the
    /// same number of empty rows appear at the top. Uses a two-pointer pass with
    /// no allocation.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        // Scan from bottom to top
        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows
    }

    /// Write a piece's minos into the board with the given color
    ///
    /// Minos above the board are dropped. Returns the number of cells written.
    pub fn lock_piece(&mut self, shape: &[MinoOffset], x: i8, y: i8, color: Color) -> usize {
        let mut written = 0;
        for &(dx, dy) in shape {
            let (Some(px), Some(py)) = (x.checked_add(dx), y.checked_add(dy)) else {
                continue;
            };
            if py >= 0 && self.set(px, py, Some(color)) {
                written += 1;
            }
        }
        written
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let width = self.width as usize;
        Some(&self.cells[y * width..(y + 1) * width])
    }

    /// Count of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = None;
        }
    }

    /// Build a board from text rows for tests and puzzles
    ///
    /// `.` is empty; `R`, `B`, `Y` are red, blue and yellow blocks; any other
    /// character is a red block. Rows shorter than the widest are padded. The
    /// board gets the usual size clamp, and text outside it is ignored.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let width = u8::try_from(width).unwrap_or(u8::MAX);
        let height = u8::try_from(rows.len()).unwrap_or(u8::MAX);
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().take(board.height as usize).enumerate() {
            for (x, ch) in row.chars().take(board.width as usize).enumerate() {
                let cell = match ch {
                    '.' => None,
                    'B' => Some(Color::Blue),
                    'Y' => Some(Color::Yellow),
                    _ => Some(Color::Red),
                };
                board.set(x as i8, y as i8, cell);
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::BOARD_WIDTH, crate::types::BOARD_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::default();
        assert_eq!(board.index(0, 0), Some(0));
        assert_eq!(board.index(9, 0), Some(9));
        assert_eq!(board.index(0, 1), Some(10));
        assert_eq!(board.index(9, 19), Some(199));
        assert_eq!(board.index(-1, 0), None);
        assert_eq!(board.index(10, 0), None);
        assert_eq!(board.index(0, 20), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::default();

        board.set(0, 0, Some(Color::Red));
        board.set(5, 10, Some(Color::Blue));

        assert_eq!(board.cells[0], Some(Color::Red));
        assert_eq!(board.cells[10 * 10 + 5], Some(Color::Blue));
    }

    #[test]
    fn test_collides_ignores_rows_above_board() {
        let mut board = Board::new(4, 4);
        board.set(1, 0, Some(Color::Red));

        // Vertical bar mostly above the board, bottom mino on an empty cell.
        let bar = [(0, 0), (0, 1), (0, 2), (0, 3)];
        assert!(!board.collides(&bar, 0, -3));
        // Same bar over the occupied column.
        assert!(board.collides(&bar, 1, -3));
        // Side walls still apply above the board.
        assert!(board.collides(&bar, -1, -3));
        assert!(board.collides(&bar, 4, -3));
        // Floor.
        assert!(board.collides(&bar, 0, 1));
    }

    #[test]
    fn test_lock_piece_skips_rows_above_board() {
        let mut board = Board::new(4, 4);
        let bar = [(0, 0), (0, 1), (0, 2), (0, 3)];
        assert_eq!(board.lock_piece(&bar, 2, -2, Color::Yellow), 2);
        assert_eq!(board.get(2, 0), Some(Some(Color::Yellow)));
        assert_eq!(board.get(2, 1), Some(Some(Color::Yellow)));
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&["....", "RB..", "Y...", "...."]);
        assert_eq!(board.width(), 4);
        assert_eq!(board.height(), 4);
        assert_eq!(board.get(0, 1), Some(Some(Color::Red)));
        assert_eq!(board.get(1, 1), Some(Some(Color::Blue)));
        assert_eq!(board.get(0, 2), Some(Some(Color::Yellow)));
        assert_eq!(board.row(0), Some(&[None, None, None, None][..]));
    }

    #[test]
    fn test_new_clamps_to_supported_range() {
        let small = Board::new(1, 0);
        assert_eq!((small.width(), small.height()), (MIN_BOARD_DIM, MIN_BOARD_DIM));
        let large = Board::new(200, 255);
        assert_eq!((large.width(), large.height()), (MAX_BOARD_DIM, MAX_BOARD_DIM));
        assert_eq!(large.cells().len(), 64 * 64);
    }

    #[test]
    fn test_from_rows_oversized_input_is_cut_to_board() {
        let wide = "R".repeat(300);
        let rows: Vec<&str> = std::iter::repeat(wide.as_str()).take(300).collect();
        let board = Board::from_rows(&rows);
        assert_eq!(board.width(), MAX_BOARD_DIM);
        assert_eq!(board.height(), MAX_BOARD_DIM);
        assert_eq!(board.filled_count(), 64 * 64);
    }
}
