//! Session configuration
//!
//! Dimensions and timing are validated once at construction; everything
//! downstream can assume a positive, finite configuration.

use anyhow::{bail, Result};

use crate::scoring::ScoreTable;
use crate::types::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_DROP_INTERVAL_MS, DEFAULT_SPEED_MULTIPLIER,
};

/// Configuration for a [`GameSession`](crate::session::GameSession).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub board_width: i32,
    pub board_height: i32,
    /// Gravity interval at level 1, in milliseconds.
    pub base_drop_interval_ms: u64,
    /// Per-level interval factor: interval = base * multiplier^(level - 1).
    pub level_speed_multiplier: f64,
    /// Scoring table (overridable per session).
    pub scoring: ScoreTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            base_drop_interval_ms: DEFAULT_DROP_INTERVAL_MS,
            level_speed_multiplier: DEFAULT_SPEED_MULTIPLIER,
            scoring: ScoreTable::default(),
        }
    }
}

impl GameConfig {
    /// Validate the configuration, failing fast on anything unusable.
    pub fn validate(&self) -> Result<()> {
        if self.board_width <= 0 || self.board_height <= 0 {
            bail!(
                "board dimensions must be positive, got {}x{}",
                self.board_width,
                self.board_height
            );
        }
        if self.board_width < 4 {
            bail!(
                "board width {} is too narrow to spawn a piece",
                self.board_width
            );
        }
        if self.base_drop_interval_ms == 0 {
            bail!("base drop interval must be positive");
        }
        if !self.level_speed_multiplier.is_finite() || self.level_speed_multiplier <= 0.0 {
            bail!(
                "level speed multiplier must be positive and finite, got {}",
                self.level_speed_multiplier
            );
        }
        Ok(())
    }
}
