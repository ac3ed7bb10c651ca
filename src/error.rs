use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for fallible arcade operations
pub type Result<T> = std::result::Result<T, ArcadeError>;

/// Errors raised outside the simulation core.
///
/// The engines themselves never fail: illegal moves are ignored and
/// terminal states are a phase, not an error.
#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Corrupt wallet file {}: {source}", .path.display())]
    CorruptWallet {
        path: PathBuf,
        #[source]
        source: ParseIntError,
    },
}
