//! Persistence of opponent profiles, game history and the opening book.

mod json;
mod memory;
mod records;

pub use json::JsonStore;
pub use memory::MemoryStore;
pub use records::{GameRecord, GameResult, GameSummary, OpeningEntry, OpeningStat, StoreData};

use crate::ai::BiasVector;
use crate::error::StoreError;

/// Storage consumed by the adaptive player.
pub trait Store {
    /// Bias vector saved with the most recent game against `opponent`.
    fn latest_biases(&self, opponent: &str) -> Result<Option<BiasVector>, StoreError>;

    fn save_game_result(
        &mut self,
        opponent: &str,
        result: GameResult,
        biases: &BiasVector,
        move_count: usize,
    ) -> Result<(), StoreError>;

    /// Upsert: one more visit for (state, column) and `reward` added to its total.
    fn update_opening_move(
        &mut self,
        state: &str,
        column: usize,
        reward: f64,
    ) -> Result<(), StoreError>;

    fn opening_stats(&self, state: &str) -> Result<Vec<OpeningStat>, StoreError>;

    fn game_summary(&self, opponent: &str) -> Result<GameSummary, StoreError>;

    /// Persist anything still buffered.
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<S: Store + ?Sized> Store for &mut S {
    fn latest_biases(&self, opponent: &str) -> Result<Option<BiasVector>, StoreError> {
        (**self).latest_biases(opponent)
    }

    fn save_game_result(
        &mut self,
        opponent: &str,
        result: GameResult,
        biases: &BiasVector,
        move_count: usize,
    ) -> Result<(), StoreError> {
        (**self).save_game_result(opponent, result, biases, move_count)
    }

    fn update_opening_move(
        &mut self,
        state: &str,
        column: usize,
        reward: f64,
    ) -> Result<(), StoreError> {
        (**self).update_opening_move(state, column, reward)
    }

    fn opening_stats(&self, state: &str) -> Result<Vec<OpeningStat>, StoreError> {
        (**self).opening_stats(state)
    }

    fn game_summary(&self, opponent: &str) -> Result<GameSummary, StoreError> {
        (**self).game_summary(opponent)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        (**self).flush()
    }
}
