//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Polling the
//! terminal and pacing frames belong to the host loop; this crate only decides
//! what a key press means.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
