//! Blockfall (workspace facade crate).
//!
//! Re-exports the member crates under one stable path:
//! `blockfall::{core, input, types}`. The implementation lives in dedicated
//! crates under `crates/`.

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_types as types;
