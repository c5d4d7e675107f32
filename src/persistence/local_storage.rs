//! Score table persisted in browser LocalStorage

use super::{ScoreStore, StoreError, StoreResult, decode_leaderboard};
use crate::leaderboard::Leaderboard;

/// Leaderboard stored as one JSON envelope under a LocalStorage key
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY)
    }
}

impl LocalStorageStore {
    pub const DEFAULT_KEY: &'static str = "lasso_feast_scores";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> StoreResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&self) -> StoreResult<Leaderboard> {
        let storage = Self::storage()?;
        match storage.get_item(&self.key) {
            Ok(Some(json)) => decode_leaderboard(&json),
            Ok(None) => Ok(Leaderboard::new()),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn store(&mut self, board: &Leaderboard) -> StoreResult<()> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(board)?;
        storage
            .set_item(&self.key, &json)
            .map_err(|_| StoreError::Unavailable)?;
        log::info!("Scores saved ({} records)", board.len());
        Ok(())
    }
}
