//! Arcade mini-game engines
//!
//! Snake and Tetris simulations that own their state and expose tick and
//! input methods, plus the small pieces a host needs to drive them: a fixed
//! period ticker, configuration and a blood-points wallet fed by the reward
//! callback.

pub mod clock;
pub mod config;
pub mod error;
pub mod grid;
pub mod reward;
pub mod snake;
pub mod tetris;
pub mod types;
pub mod wallet;

pub use error::{ArcadeError, Result};
pub use types::{Command, MiniGame, Phase};
