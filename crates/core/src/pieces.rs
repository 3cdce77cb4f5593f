//! Pieces module - tetromino layouts and matrix rotation
//!
//! Each kind has a base layout matrix. A rotation index `k` means the base
//! matrix turned 90° clockwise `k` times. Shapes are returned as four
//! `(dx, dy)` offsets from the piece origin (the top-left corner of the
//! rotated matrix), in row-major order.

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Base layout of a piece kind: rows of occupancy flags
pub fn base_layout(kind: PieceKind) -> &'static [&'static [u8]] {
    match kind {
        PieceKind::I => &[&[1, 1, 1, 1]],
        PieceKind::O => &[&[1, 1], &[1, 1]],
        PieceKind::T => &[&[0, 1, 0], &[1, 1, 1]],
        PieceKind::J => &[&[1, 0, 0], &[1, 1, 1]],
        PieceKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        PieceKind::S => &[&[1, 1, 0], &[0, 1, 1]],
        PieceKind::Z => &[&[0, 1, 1], &[1, 1, 0]],
    }
}

/// Width and height (columns, rows) of the base layout
pub fn base_size(kind: PieceKind) -> (i8, i8) {
    let layout = base_layout(kind);
    (layout[0].len() as i8, layout.len() as i8)
}

/// Width and height of the rotated layout's bounding matrix
pub fn rotated_size(kind: PieceKind, rotation: Rotation) -> (i8, i8) {
    let (w, h) = base_size(kind);
    if rotation.index() % 2 == 0 {
        (w, h)
    } else {
        (h, w)
    }
}

/// Get the shape (mino offsets) for a piece kind and rotation
///
/// One clockwise quarter turn maps the cell at `(col, row)` in a matrix of
/// `rows` rows to `(rows - 1 - row, col)`.
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let layout = base_layout(kind);
    let mut shape = [(0i8, 0i8); 4];
    let mut n = 0usize;

    for (row, cols) in layout.iter().enumerate() {
        for (col, &filled) in cols.iter().enumerate() {
            if filled != 0 {
                shape[n] = (col as i8, row as i8);
                n += 1;
            }
        }
    }
    debug_assert_eq!(n, 4);

    let (mut cols, mut rows) = base_size(kind);
    for _ in 0..rotation.index() {
        for cell in &mut shape {
            let (x, y) = *cell;
            *cell = (rows - 1 - y, x);
        }
        std::mem::swap(&mut rows, &mut cols);
    }

    // Row-major, matching the order a renderer walks the rotated matrix.
    shape.sort_unstable_by_key(|&(x, y)| (y, x));
    shape
}

/// Column where a piece spawns: horizontally centered by its base width
pub fn spawn_x(kind: PieceKind, board_width: u8) -> i8 {
    let (w, _) = base_size(kind);
    (board_width / 2) as i8 - w / 2
}

/// Spawn row for new pieces
pub const SPAWN_Y: i8 = 0;

/// Get initial shape for a new piece
pub fn get_spawn_shape(kind: PieceKind) -> PieceShape {
    get_shape(kind, Rotation::North)
}
