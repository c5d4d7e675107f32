//! Score table persisted as a JSON file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{ScoreStore, StoreError, StoreResult, decode_leaderboard};
use crate::leaderboard::Leaderboard;

/// Leaderboard in a single JSON file.
///
/// Writes go to `<file>.tmp` first and are renamed over the target, so a
/// crash mid-write leaves the previous table intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> StoreResult<Leaderboard> {
        match fs::read_to_string(&self.path) {
            Ok(json) => decode_leaderboard(&json),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Leaderboard::new()),
            Err(e) => Err(Self::io_error(&self.path, e)),
        }
    }

    fn store(&mut self, board: &Leaderboard) -> StoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Self::io_error(dir, e))?;
        }
        let json = serde_json::to_string_pretty(board)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| Self::io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| Self::io_error(&self.path, e))?;
        log::debug!("Wrote {} records to {}", board.len(), self.path.display());
        Ok(())
    }
}
