//! Score persistence
//!
//! Backends only load and store a whole [`Leaderboard`]; the record-level
//! operations the session needs are provided on top of that:
//! - `MemoryStore`: in-process table
//! - `JsonFileStore`: versioned JSON file, written via tmp + rename (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

#[cfg(not(target_arch = "wasm32"))]
mod json_file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use json_file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use std::path::PathBuf;

use thiserror::Error;

use crate::leaderboard::{LEADERBOARD_VERSION, Leaderboard, ScorePolicy, ScoreRecord};

/// Errors returned by score stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed score data: {0}")]
    Format(#[from] serde_json::Error),
    #[error("score data version {0} is newer than this build supports")]
    UnsupportedVersion(u32),
    #[error("score storage unavailable")]
    Unavailable,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Parse a leaderboard envelope, rejecting versions from the future
pub fn decode_leaderboard(json: &str) -> StoreResult<Leaderboard> {
    let board: Leaderboard = serde_json::from_str(json)?;
    if board.version > LEADERBOARD_VERSION {
        return Err(StoreError::UnsupportedVersion(board.version));
    }
    Ok(board)
}

/// Persistent per-username score storage
pub trait ScoreStore {
    /// Read the whole table
    fn load(&self) -> StoreResult<Leaderboard>;

    /// Replace the whole table
    fn store(&mut self, board: &Leaderboard) -> StoreResult<()>;

    fn record_exists(&self, username: &str) -> StoreResult<bool> {
        Ok(self.load()?.contains(username))
    }

    fn find(&self, username: &str) -> StoreResult<Option<ScoreRecord>> {
        Ok(self.load()?.get(username).cloned())
    }

    /// Insert a zero record unless the username is already known
    fn create_if_absent(&mut self, username: &str) -> StoreResult<()> {
        let mut board = self.load()?;
        if board.create_if_absent(username) {
            self.store(&board)?;
            log::info!("Created score record for {}", username);
        }
        Ok(())
    }

    /// Merge a finished session under `policy`
    fn upsert_best_or_accumulate(
        &mut self,
        session: &ScoreRecord,
        policy: ScorePolicy,
    ) -> StoreResult<()> {
        let mut board = self.load()?;
        if board.apply(session, policy) {
            self.store(&board)?;
            log::info!(
                "Saved {} ({:?}): score {} count {}",
                session.username,
                policy,
                session.score,
                session.count
            );
        } else {
            log::info!(
                "Kept stored record for {}; session score {} not higher",
                session.username,
                session.score
            );
        }
        Ok(())
    }

    /// All records, best first
    fn leaderboard(&self) -> StoreResult<Vec<ScoreRecord>> {
        Ok(self.load()?.ranked())
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: Leaderboard,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> StoreResult<Leaderboard> {
        Ok(self.board.clone())
    }

    fn store(&mut self, board: &Leaderboard) -> StoreResult<()> {
        self.board = board.clone();
        Ok(())
    }
}
