use std::path::{Path, PathBuf};

use crate::error::{ArcadeError, Result};

/// Blood-points balance credited by the engines' reward callback.
///
/// Stored as a plain number in a text file when a path is set.
#[derive(Debug, Clone, Default)]
pub struct Wallet {
    balance: u64,
    path: Option<PathBuf>,
}

impl Wallet {
    /// In-memory wallet, nothing is written to disk
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the wallet stored at `path`. A missing file is an empty wallet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let balance = match std::fs::read_to_string(&path) {
            Ok(text) => text
                .trim()
                .parse()
                .map_err(|source| ArcadeError::CorruptWallet {
                    path: path.clone(),
                    source,
                })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Opened wallet {} with balance {}", path.display(), balance);
        Ok(Self {
            balance,
            path: Some(path),
        })
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn credit(&mut self, points: u64) {
        self.balance = self.balance.saturating_add(points);
        tracing::debug!("Credited {} blood points, balance {}", points, self.balance);
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            std::fs::write(path, self.balance.to_string())?;
        }
        Ok(())
    }
}
