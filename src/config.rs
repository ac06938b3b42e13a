//! Match configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::game::BoardParams;

/// Tunable constants of a match.
///
/// Missing fields in a config file fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Board generation parameters.
    pub board: BoardParams,
    /// Time between ticks in milliseconds.
    pub tick_period_ms: u64,
    /// Crowns and owned castles grow every this many ticks (0 = never).
    pub growth_interval: u32,
    /// Armies grow on growth ticks that are also a multiple of this
    /// (0 = never).
    pub army_growth_interval: u32,
    /// Seed for board generation; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            board: BoardParams::default(),
            tick_period_ms: 500,
            growth_interval: 2,
            army_growth_interval: 30,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Load a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if the file cannot be read, is not
    /// valid JSON, or fails [`MatchConfig::validate`].
    pub fn from_json_file(path: &Path) -> GameResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| GameError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] for a zero board size or tick period, or
    /// an empty garrison range.
    pub fn validate(&self) -> GameResult<()> {
        if self.board.size == 0 {
            return Err(GameError::Config("board size must be positive".into()));
        }
        if self.board.garrison_min > self.board.garrison_max {
            return Err(GameError::Config(format!(
                "garrison range {}..={} is empty",
                self.board.garrison_min, self.board.garrison_max
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(GameError::Config("tick period must be positive".into()));
        }
        Ok(())
    }

    /// Time between ticks.
    #[must_use]
    pub const fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Whether `tick` is a growth tick.
    #[must_use]
    pub const fn is_growth_tick(&self, tick: u32) -> bool {
        self.growth_interval != 0 && tick % self.growth_interval == 0
    }

    /// Whether armies grow on `tick` (which must also be a growth tick).
    #[must_use]
    pub const fn is_army_growth_tick(&self, tick: u32) -> bool {
        self.army_growth_interval != 0 && tick % self.army_growth_interval == 0
    }
}
