//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the board engine: grid state, the active piece, scoring and
//! the game-over state. It has no UI, networking or I/O, which makes it:
//!
//! - **Deterministic**: Same seed produces identical piece sequences
//! - **Testable**: Every rule is reachable through plain method calls
//! - **Portable**: Any host loop (terminal, GUI, headless) can drive it
//!
//! # Module Structure
//!
//! - [`board`]: Fixed-size grid with collision checks and line clearing
//! - [`config`]: Board size, gravity interval and seed, with env overrides
//! - [`game_state`]: Active piece, movement, rotation, locking, score, game over
//! - [`pieces`]: Tetromino layouts and clockwise matrix rotation
//! - [`rng`]: Seedable random source for piece kind and color
//! - [`snapshot`]: Renderer-facing copy of the state
//!
//! # Game Rules
//!
//! - Pieces spawn centered on row 0 with a uniformly random kind and color
//! - A spawn that overlaps locked cells ends the game for good
//! - Moves and rotations that collide are reverted; a blocked downward move locks
//! - Each cleared row scores one point
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameConfig, GameState};
//! use blockfall_types::GameAction;
//!
//! let mut game = GameState::new(GameConfig::default().with_seed(12345));
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.pieces_spawned(), 2);
//! assert_eq!(game.board().filled_count(), 4);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed milliseconds; the piece falls one row per fall interval (500ms by
//! default).

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows};
pub use config::GameConfig;
pub use game_state::{GameState, LockEvent, Tetromino};
pub use pieces::{get_shape, PieceShape};
pub use rng::{PieceRng, SimpleRng};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
