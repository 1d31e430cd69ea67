use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ai::BiasVector;

/// Game result from the adaptive player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameResult::Win => "win",
            GameResult::Loss => "loss",
            GameResult::Draw => "draw",
        })
    }
}

/// One finished game, with the opponent profile as it stood at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub timestamp: DateTime<Utc>,
    pub opponent: String,
    pub result: GameResult,
    pub move_count: usize,
    pub biases: BiasVector,
}

/// Accumulated bandit statistics for one (state, column) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningEntry {
    pub visits: u64,
    pub total_reward: f64,
}

/// Row returned by [`Store::opening_stats`](super::Store::opening_stats).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningStat {
    pub column: usize,
    pub visits: u64,
    pub total_reward: f64,
}

impl OpeningStat {
    pub fn average(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }
}

/// Historical results against one opponent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameSummary {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub average_moves: f64,
}

impl GameSummary {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// Everything a store persists. Shared by the in-memory and file stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreData {
    pub games: Vec<GameRecord>,
    /// state key -> column -> stats
    pub openings: BTreeMap<String, BTreeMap<usize, OpeningEntry>>,
}

impl StoreData {
    pub fn latest_biases(&self, opponent: &str) -> Option<BiasVector> {
        self.games
            .iter()
            .rev()
            .find(|g| g.opponent == opponent)
            .map(|g| g.biases)
    }

    pub fn push_game(
        &mut self,
        opponent: &str,
        result: GameResult,
        biases: &BiasVector,
        move_count: usize,
    ) {
        self.games.push(GameRecord {
            timestamp: Utc::now(),
            opponent: opponent.to_string(),
            result,
            move_count,
            biases: *biases,
        });
    }

    /// Insert-or-increment: one more visit and `reward` added to the total.
    pub fn upsert_opening(&mut self, state: &str, column: usize, reward: f64) {
        let entry = self
            .openings
            .entry(state.to_string())
            .or_default()
            .entry(column)
            .or_default();
        entry.visits += 1;
        entry.total_reward += reward;
    }

    /// Stats for every column tried at `state`, in column order.
    pub fn opening_stats(&self, state: &str) -> Vec<OpeningStat> {
        self.openings
            .get(state)
            .map(|columns| {
                columns
                    .iter()
                    .map(|(&column, e)| OpeningStat {
                        column,
                        visits: e.visits,
                        total_reward: e.total_reward,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn summary(&self, opponent: &str) -> GameSummary {
        let mut summary = GameSummary::default();
        let mut total_moves = 0;
        for game in self.games.iter().filter(|g| g.opponent == opponent) {
            summary.games += 1;
            total_moves += game.move_count;
            match game.result {
                GameResult::Win => summary.wins += 1,
                GameResult::Loss => summary.losses += 1,
                GameResult::Draw => summary.draws += 1,
            }
        }
        if summary.games > 0 {
            summary.average_moves = total_moves as f64 / summary.games as f64;
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_accumulates() {
        let mut data = StoreData::default();
        data.upsert_opening("0_0", 3, 100.0);
        data.upsert_opening("0_0", 3, -20.0);
        data.upsert_opening("0_0", 2, -100.0);
        let stats = data.opening_stats("0_0");
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].column, 2);
        assert_eq!(stats[1].visits, 2);
        assert!((stats[1].average() - 40.0).abs() < 1e-9);
        assert!(data.opening_stats("1_0").is_empty());
    }

    #[test]
    fn test_latest_biases_per_opponent() {
        let mut data = StoreData::default();
        let a = BiasVector {
            diagonal_weakness: 2.0,
            ..BiasVector::neutral()
        };
        let b = BiasVector {
            vertical_weakness: 1.5,
            ..BiasVector::neutral()
        };
        data.push_game("diagonal", GameResult::Win, &BiasVector::neutral(), 20);
        data.push_game("diagonal", GameResult::Win, &a, 18);
        data.push_game("casual", GameResult::Loss, &b, 30);
        assert_eq!(data.latest_biases("diagonal"), Some(a));
        assert_eq!(data.latest_biases("casual"), Some(b));
        assert_eq!(data.latest_biases("edge"), None);
    }

    #[test]
    fn test_summary() {
        let mut data = StoreData::default();
        let n = BiasVector::neutral();
        data.push_game("casual", GameResult::Win, &n, 10);
        data.push_game("casual", GameResult::Draw, &n, 42);
        data.push_game("casual", GameResult::Loss, &n, 20);
        data.push_game("edge", GameResult::Win, &n, 7);
        let s = data.summary("casual");
        assert_eq!((s.games, s.wins, s.losses, s.draws), (3, 1, 1, 1));
        assert!((s.average_moves - 24.0).abs() < 1e-9);
        assert_eq!(data.summary("nobody"), GameSummary::default());
    }

    #[test]
    fn test_game_result_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&GameResult::Draw).unwrap(), "\"draw\"");
        assert_eq!(GameResult::Loss.to_string(), "loss");
    }
}
