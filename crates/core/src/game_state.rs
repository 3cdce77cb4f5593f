//! Game state module - the board engine
//!
//! Ties together the board, the active piece, the piece RNG and the score.
//! Handles movement, rotation, hard drop, locking, line clears, gravity
//! timing and the terminal game-over state.

use anyhow::Result;
use serde::Serialize;

use crate::board::{Board, ClearedRows};
use crate::config::GameConfig;
use crate::pieces::{get_shape, rotated_size, spawn_x, PieceShape, SPAWN_Y};
use crate::rng::{PieceRng, SimpleRng};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub color: Color,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at the spawn position for a board of `board_width` columns
    pub fn new(kind: PieceKind, color: Color, board_width: u8) -> Self {
        Self::at(kind, color, spawn_x(kind, board_width), SPAWN_Y)
    }

    /// Create a tetromino in the North rotation at an explicit origin
    pub fn at(kind: PieceKind, color: Color, x: i8, y: i8) -> Self {
        Self {
            kind,
            color,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Columns and rows spanned by the current rotation
    pub fn size(&self) -> (i8, i8) {
        rotated_size(self.kind, self.rotation)
    }

    /// Advance the rotation by one clockwise step
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.rotate_cw();
    }

    /// Check whether the piece collides with the board walls, floor or locked cells
    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.shape(), self.x, self.y)
    }
}

/// What happened when the last piece locked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Removed row indices, bottom to top, in pre-clear coordinates
    pub cleared_rows: ClearedRows,
    /// Score after the clear
    pub score: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<R: PieceRng = SimpleRng> {
    config: GameConfig,
    board: Board,
    active: Tetromino,
    rng: R,
    score: u32,
    game_over: bool,
    fall_timer_ms: u32,
    /// Pieces successfully placed at the spawn position
    pieces_spawned: u32,
    last_lock: Option<LockEvent>,
}

impl GameState<SimpleRng> {
    /// Create a new game seeded from `config.seed` and spawn the first piece
    ///
    /// The config is not validated; out-of-range board sizes are clamped.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, SimpleRng::new(config.seed))
    }

    /// Validate `config`, then create a new game
    pub fn try_new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }
}

impl<R: PieceRng> GameState<R> {
    /// Create a new game drawing pieces from `rng` and spawn the first piece
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        let board = Board::new(config.width, config.height);
        let mut state = Self {
            config,
            active: Tetromino::new(PieceKind::I, Color::Red, board.width()),
            board,
            rng,
            score: 0,
            game_over: false,
            fall_timer_ms: 0,
            pieces_spawned: 0,
            last_lock: None,
        };
        state.spawn_piece();
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn active(&self) -> Tetromino {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn last_lock(&self) -> Option<&LockEvent> {
        self.last_lock.as_ref()
    }

    pub fn fall_timer_ms(&self) -> u32 {
        self.fall_timer_ms
    }

    /// Mutable board access for setting up positions (puzzles, tests)
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replace the active piece without any collision check (puzzles, tests)
    pub fn set_active(&mut self, piece: Tetromino) {
        self.active = piece;
    }

    /// Check whether `piece` collides with the current board
    pub fn collides(&self, piece: &Tetromino) -> bool {
        piece.collides(&self.board)
    }

    /// Spawn a new random piece at the top center
    ///
    /// If the new piece overlaps the board the game is over; the piece stays
    /// as the active one so a renderer can show what blocked the spawn.
    /// Returns false on game over.
    pub fn spawn_piece(&mut self) -> bool {
        if self.game_over {
            tracing::trace!("spawn ignored after game over");
            return false;
        }

        let kind = self.rng.next_kind();
        let color = self.rng.next_color();
        let piece = Tetromino::new(kind, color, self.board.width());
        self.active = piece;

        if self.collides(&piece) {
            self.game_over = true;
            tracing::info!(
                score = self.score,
                pieces = self.pieces_spawned,
                kind = kind.as_str(),
                "game over: spawn blocked"
            );
            return false;
        }

        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
        tracing::debug!(
            kind = kind.as_str(),
            color = color.as_str(),
            x = piece.x,
            "spawned piece"
        );
        true
    }

    /// Translate the active piece
    ///
    /// A blocked move is reverted; a blocked downward move also locks the
    /// piece. Returns true if the piece moved.
    pub fn move_piece(&mut self, dx: i8, dy: i8) -> bool {
        if self.game_over {
            tracing::trace!(dx, dy, "move ignored after game over");
            return false;
        }

        let active = self.active;
        let moved = match (active.x.checked_add(dx), active.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Tetromino { x, y, ..active }),
            _ => None,
        };

        match moved {
            Some(piece) if !self.collides(&piece) => {
                self.active = piece;
                true
            }
            _ => {
                if dy > 0 {
                    self.freeze();
                }
                false
            }
        }
    }

    /// Rotate the active piece one step clockwise
    ///
    /// A blocked rotation is reverted by three more clockwise steps. Returns
    /// true if the piece rotated.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            tracing::trace!("rotate ignored after game over");
            return false;
        }

        self.active.rotate();
        if self.collides(&self.active) {
            for _ in 0..3 {
                self.active.rotate();
            }
            return false;
        }
        true
    }

    /// Drop the active piece to the lowest free row and lock it
    ///
    /// Walks down from the current row until the first colliding position, then
    /// settles one row above it. The floor always collides, so this terminates.
    /// Returns the number of rows the piece travelled.
    pub fn hard_drop(&mut self) -> u32 {
        if self.game_over {
            tracing::trace!("hard drop ignored after game over");
            return 0;
        }

        let start_y = self.active.y;
        let mut probe = self.active;
        while !self.collides(&probe) {
            probe.y += 1;
        }
        probe.y -= 1;
        self.active = probe;
        self.freeze();

        (probe.y - start_y).max(0) as u32
    }

    /// Lock the active piece into the board, clear lines and spawn the next piece
    pub fn freeze(&mut self) {
        if self.game_over {
            tracing::trace!("freeze ignored after game over");
            return;
        }

        let piece = self.active;
        self.board
            .lock_piece(&piece.shape(), piece.x, piece.y, piece.color);

        let cleared_rows = self.clear_full_rows();
        let lines_cleared = cleared_rows.len() as u32;
        tracing::debug!(
            kind = piece.kind.as_str(),
            x = piece.x,
            y = piece.y,
            lines_cleared,
            score = self.score,
            "piece locked"
        );
        self.last_lock = Some(LockEvent {
            lines_cleared,
            cleared_rows,
            score: self.score,
        });

        self.spawn_piece();
    }

    /// Remove every full row, shift the rest down and score one point per row
    ///
    /// Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        self.clear_full_rows().len() as u32
    }

    fn clear_full_rows(&mut self) -> ClearedRows {
        let cleared = self.board.clear_full_rows();
        self.score = self
            .score
            .saturating_add(cleared.len() as u32 * SCORE_PER_LINE);
        cleared
    }

    /// Advance the gravity timer by `elapsed_ms`
    ///
    /// Once the accumulated time exceeds the fall interval the piece moves down
    /// one row (locking if blocked) and the timer restarts from zero. Returns
    /// true if a gravity step happened.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.game_over {
            tracing::trace!(elapsed_ms, "tick ignored after game over");
            return false;
        }

        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
        if self.fall_timer_ms <= self.config.fall_interval_ms {
            return false;
        }

        self.fall_timer_ms = 0;
        self.move_piece(0, 1);
        true
    }

    /// Apply a player action
    ///
    /// Returns true if the action changed the state: a move or rotation that
    /// succeeded, a soft drop that moved or locked, or any hard drop.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if self.game_over {
            return false;
        }

        match action {
            GameAction::MoveLeft => self.move_piece(-1, 0),
            GameAction::MoveRight => self.move_piece(1, 0),
            GameAction::SoftDrop => {
                let before = self.pieces_spawned;
                self.move_piece(0, 1) || self.pieces_spawned != before || self.game_over
            }
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => {
                self.hard_drop();
                true
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut crate::snapshot::GameSnapshot) {
        use crate::snapshot::ActiveSnapshot;

        out.width = self.board.width();
        out.height = self.board.height();
        out.cells.clear();
        out.cells.extend_from_slice(self.board.cells());
        out.active = Some(ActiveSnapshot::from(self.active));
        out.score = self.score;
        out.game_over = self.game_over;
        out.pieces_spawned = self.pieces_spawned;
        out.last_lock = self.last_lock.clone();
    }

    pub fn snapshot(&self) -> crate::snapshot::GameSnapshot {
        let mut s = crate::snapshot::GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of values, cycling
    struct Scripted(Vec<u32>, usize);

    impl PieceRng for Scripted {
        fn next_range(&mut self, max: u32) -> u32 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v % max
        }
    }

    /// Every spawn is a red I piece
    fn i_pieces() -> Scripted {
        Scripted(vec![0], 0)
    }

    #[test]
    fn test_new_game_spawns_first_piece() {
        let state = GameState::new(GameConfig::default().with_seed(12345));
        assert!(!state.game_over());
        assert_eq!(state.pieces_spawned(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.active().y, 0);
        assert_eq!(state.active().rotation, Rotation::North);
    }

    #[test]
    fn test_try_new_rejects_bad_config() {
        assert!(GameState::try_new(GameConfig::default().with_size(2, 2)).is_err());
        assert!(GameState::try_new(GameConfig::default()).is_ok());
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = GameState::new(GameConfig::default().with_seed(9));
        let mut b = GameState::new(GameConfig::default().with_seed(9));
        for _ in 0..5 {
            assert_eq!(a.active(), b.active());
            a.hard_drop();
            b.hard_drop();
        }
    }

    #[test]
    fn test_soft_drop_into_floor_locks() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        state.set_active(Tetromino::at(PieceKind::I, Color::Blue, 0, 19));
        assert!(!state.move_piece(0, 1));
        assert_eq!(state.board().filled_count(), 4);
        assert_eq!(state.pieces_spawned(), 2);
    }

    #[test]
    fn test_blocked_sideways_move_does_not_lock() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        state.set_active(Tetromino::at(PieceKind::I, Color::Blue, 0, 19));
        assert!(!state.move_piece(-1, 0));
        assert_eq!(state.board().filled_count(), 0);
        assert_eq!(state.pieces_spawned(), 1);
    }

    #[test]
    fn test_blocked_upward_move_does_not_lock() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        state.board_mut().set(3, 4, Some(Color::Red));
        state.set_active(Tetromino::at(PieceKind::I, Color::Blue, 3, 5));
        assert!(!state.move_piece(0, -1));
        assert_eq!(state.board().filled_count(), 1);
        assert_eq!(state.active().y, 5);
    }

    #[test]
    fn test_rotation_reverts_with_three_steps() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        // Horizontal I on the floor cannot turn vertical.
        state.set_active(Tetromino::at(PieceKind::I, Color::Blue, 3, 19));
        assert!(!state.rotate());
        assert_eq!(state.active().rotation, Rotation::North);
        assert_eq!(state.active().x, 3);
        assert_eq!(state.active().y, 19);
    }

    #[test]
    fn test_huge_move_is_blocked_not_overflowing() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        let before = state.active();
        assert!(!state.move_piece(i8::MAX, 0));
        assert_eq!(state.active(), before);
    }

    #[test]
    fn test_tick_applies_gravity_after_interval() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        assert!(!state.tick(250));
        assert!(!state.tick(250));
        assert_eq!(state.active().y, 0);
        // Strictly greater than the interval triggers the step.
        assert!(state.tick(1));
        assert_eq!(state.active().y, 1);
        assert_eq!(state.fall_timer_ms(), 0);
    }

    #[test]
    fn test_gravity_timer_survives_lock_and_spawn() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        assert!(!state.tick(400));
        state.hard_drop();
        assert_eq!(state.pieces_spawned(), 2);
        assert_eq!(state.fall_timer_ms(), 400);
        // 501ms accumulated across the lock.
        assert!(state.tick(101));
        assert_eq!(state.active().y, 1);
        assert_eq!(state.fall_timer_ms(), 0);
    }

    #[test]
    fn test_tiny_config_is_clamped_to_minimum_board() {
        let state = GameState::with_rng(GameConfig::default().with_size(1, 1), i_pieces());
        assert_eq!(state.board().width(), MIN_BOARD_DIM);
        assert_eq!(state.board().height(), MIN_BOARD_DIM);
        assert!(!state.game_over());
        assert_eq!((state.active().x, state.active().y), (0, 0));
    }

    #[test]
    fn test_game_over_is_absorbing() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        // Nearly full top row: blocks every spawn without being cleared.
        for x in 1..10 {
            state.board_mut().set(x, 0, Some(Color::Red));
        }
        // Lock any piece; the respawned I overlaps row 0.
        state.set_active(Tetromino::at(PieceKind::O, Color::Blue, 0, 18));
        state.freeze();
        assert!(state.game_over());

        let frozen = state.active();
        let spawned = state.pieces_spawned();
        assert!(!state.move_piece(1, 0));
        assert!(!state.rotate());
        assert_eq!(state.hard_drop(), 0);
        assert!(!state.tick(10_000));
        assert!(!state.apply_action(GameAction::HardDrop));
        assert!(!state.spawn_piece());
        assert_eq!(state.active(), frozen);
        assert_eq!(state.pieces_spawned(), spawned);
        assert!(state.game_over());
    }

    #[test]
    fn test_lock_event_records_cleared_rows() {
        let mut state = GameState::with_rng(GameConfig::default(), i_pieces());
        for x in 4..10 {
            state.board_mut().set(x, 19, Some(Color::Yellow));
        }
        state.set_active(Tetromino::at(PieceKind::I, Color::Blue, 0, 0));
        state.hard_drop();

        let event = state.last_lock().unwrap();
        assert_eq!(event.lines_cleared, 1);
        assert_eq!(event.cleared_rows.as_slice(), &[19]);
        assert_eq!(event.score, 1);
        assert_eq!(state.score(), 1);
        assert_eq!(state.board().filled_count(), 0);
    }
}
