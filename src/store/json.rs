use std::fs;
use std::path::{Path, PathBuf};

use super::{GameResult, GameSummary, OpeningStat, Store, StoreData};
use crate::ai::BiasVector;
use crate::error::StoreError;

/// File-backed store: the whole dataset as one pretty-printed JSON document.
///
/// Opening updates are buffered in memory; the file is rewritten after every
/// saved game and on [`flush`](Store::flush).
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: StoreData,
    dirty: bool,
}

impl JsonStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|e| StoreError::FileRead {
                path: path.clone(),
                source: e,
            })?;
            serde_json::from_str(&text).map_err(|e| StoreError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            log::info!("store {} not found, starting empty", path.display());
            StoreData::default()
        };
        Ok(JsonStore {
            path,
            data,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    fn write(&mut self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&tmp, json)?;
        // Atomic rename
        fs::rename(&tmp, &self.path)?;
        self.dirty = false;
        Ok(())
    }
}

impl Store for JsonStore {
    fn latest_biases(&self, opponent: &str) -> Result<Option<BiasVector>, StoreError> {
        Ok(self.data.latest_biases(opponent))
    }

    fn save_game_result(
        &mut self,
        opponent: &str,
        result: GameResult,
        biases: &BiasVector,
        move_count: usize,
    ) -> Result<(), StoreError> {
        self.data.push_game(opponent, result, biases, move_count);
        self.write()
    }

    fn update_opening_move(
        &mut self,
        state: &str,
        column: usize,
        reward: f64,
    ) -> Result<(), StoreError> {
        self.data.upsert_opening(state, column, reward);
        self.dirty = true;
        Ok(())
    }

    fn opening_stats(&self, state: &str) -> Result<Vec<OpeningStat>, StoreError> {
        Ok(self.data.opening_stats(state))
    }

    fn game_summary(&self, opponent: &str) -> Result<GameSummary, StoreError> {
        Ok(self.data.summary(opponent))
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if self.dirty {
            self.write()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_opens_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path().join("store.json")).unwrap();
        assert_eq!(store.data(), &StoreData::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("store.json");
        let biases = BiasVector {
            diagonal_weakness: 2.2,
            ..BiasVector::neutral()
        };

        {
            let mut store = JsonStore::open(&path).unwrap();
            store.update_opening_move("0_0", 3, 100.0).unwrap();
            store.update_opening_move("0_0", 3, -20.0).unwrap();
            store
                .save_game_result("diagonal", GameResult::Win, &biases, 21)
                .unwrap();
        }

        let store = JsonStore::open(&path).unwrap();
        assert_eq!(store.latest_biases("diagonal").unwrap(), Some(biases));
        let stats = store.opening_stats("0_0").unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].visits, 2);
        assert!((stats[0].total_reward - 80.0).abs() < 1e-9);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_flush_writes_buffered_openings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let mut store = JsonStore::open(&path).unwrap();
        store.update_opening_move("5_9", 1, -100.0).unwrap();
        assert!(!path.exists());
        store.flush().unwrap();
        assert!(path.exists());

        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.opening_stats("5_9").unwrap()[0].column, 1);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }
}
