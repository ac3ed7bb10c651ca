//! Configuration for the engines and the host

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};
use crate::grid::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Width of the snake grid
    pub width: i16,
    /// Height of the snake grid
    pub height: i16,
    /// Head position after open and after every reset
    pub start: Position,
    /// Food position when the game is first opened
    pub initial_food: Position,
    /// Step period in milliseconds
    pub tick_ms: u64,
    /// Score added per food eaten
    pub food_score: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            start: Position::new(10, 10),
            initial_food: Position::new(15, 15),
            tick_ms: 150,
            food_score: 10,
        }
    }
}

impl SnakeConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ArcadeError::InvalidConfig(format!(
                "snake grid must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        for (name, pos) in [("start", self.start), ("initial_food", self.initial_food)] {
            if !pos.in_bounds(self.width, self.height) {
                return Err(ArcadeError::InvalidConfig(format!(
                    "snake {} ({}, {}) lies outside the {}x{} grid",
                    name, pos.x, pos.y, self.width, self.height
                )));
            }
        }
        if self.tick_ms == 0 {
            return Err(ArcadeError::InvalidConfig("snake tick_ms must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisConfig {
    /// Gravity period in milliseconds
    pub tick_ms: u64,
    /// Score added per cleared row
    pub line_score: u32,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            line_score: 100,
        }
    }
}

impl TetrisConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(ArcadeError::InvalidConfig("tetris tick_ms must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Blood points credited each time an engine fires its reward callback
    pub points_per_reward: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            points_per_reward: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub snake: SnakeConfig,
    pub tetris: TetrisConfig,
    pub reward: RewardConfig,
}

impl ArcadeConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ArcadeConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.snake.validate()?;
        self.tetris.validate()
    }
}
