use super::{GameResult, GameSummary, OpeningStat, Store, StoreData};
use crate::ai::BiasVector;
use crate::error::StoreError;

/// Volatile store. Used when persistence is disabled and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }
}

impl Store for MemoryStore {
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
        Ok(())
    }

    fn update_opening_move(
        &mut self,
        state: &str,
        column: usize,
        reward: f64,
    ) -> Result<(), StoreError> {
        self.data.upsert_opening(state, column, reward);
        Ok(())
    }

    fn opening_stats(&self, state: &str) -> Result<Vec<OpeningStat>, StoreError> {
        Ok(self.data.opening_stats(state))
    }

    fn game_summary(&self, opponent: &str) -> Result<GameSummary, StoreError> {
        Ok(self.data.summary(opponent))
    }
}
