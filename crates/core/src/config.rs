//! Game configuration
//!
//! Board size, gravity cadence and RNG seed. Values come from
//! [`GameConfig::default`] or from environment variables:
//!
//! - `BLOCKFALL_WIDTH`: Board columns (default: 10)
//! - `BLOCKFALL_HEIGHT`: Board rows (default: 20)
//! - `BLOCKFALL_FALL_MS`: Gravity interval in milliseconds (default: 500)
//! - `BLOCKFALL_SEED`: Piece RNG seed (default: 1)

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, FALL_INTERVAL_MS, MAX_BOARD_DIM, MIN_BOARD_DIM};

const WIDE_BOARD_DIM: u8 = 20;

/// Engine settings
///
/// The default board is the common 10 wide by 20 tall well. [`GameConfig::wide`]
/// gives the square 20x20 layout of the classic desktop version; any size in
/// `MIN_BOARD_DIM..=MAX_BOARD_DIM` works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    pub fall_interval_ms: u32,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            fall_interval_ms: FALL_INTERVAL_MS,
            seed: 1,
        }
    }
}

impl GameConfig {
    /// Default settings on a 20x20 board
    pub fn wide() -> Self {
        Self::default().with_size(WIDE_BOARD_DIM, WIDE_BOARD_DIM)
    }

    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_fall_interval_ms(mut self, ms: u32) -> Self {
        self.fall_interval_ms = ms;
        self
    }

    /// Create from environment variables, falling back to defaults for unset ones
    ///
    /// A variable that is set but does not parse, or a resulting config that
    /// fails [`GameConfig::validate`], is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`GameConfig::from_env`] with an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            width: parse_var(&lookup, "BLOCKFALL_WIDTH")?.unwrap_or(defaults.width),
            height: parse_var(&lookup, "BLOCKFALL_HEIGHT")?.unwrap_or(defaults.height),
            fall_interval_ms: parse_var(&lookup, "BLOCKFALL_FALL_MS")?
                .unwrap_or(defaults.fall_interval_ms),
            seed: parse_var(&lookup, "BLOCKFALL_SEED")?.unwrap_or(defaults.seed),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject sizes a tetromino cannot move in and a zero gravity interval
    pub fn validate(&self) -> Result<()> {
        let range = MIN_BOARD_DIM..=MAX_BOARD_DIM;
        if !range.contains(&self.width) {
            bail!(
                "config: board width {} out of range {}..={}",
                self.width,
                MIN_BOARD_DIM,
                MAX_BOARD_DIM
            );
        }
        if !range.contains(&self.height) {
            bail!(
                "config: board height {} out of range {}..={}",
                self.height,
                MIN_BOARD_DIM,
                MAX_BOARD_DIM
            );
        }
        if self.fall_interval_ms == 0 {
            return Err(anyhow!("config: fall interval must be positive"));
        }
        Ok(())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .with_context(|| format!("config: invalid {} value: {}", key, raw))
}
