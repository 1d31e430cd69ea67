//! Opening book learned from game outcomes with a UCB1 bandit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::game::{Board, Player};
use crate::store::Store;

/// Position key from the mover's point of view: the mover's bits first.
///
/// Keying relative to the mover lets the same physical position share
/// statistics whichever colour reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub own: u64,
    pub other: u64,
}

impl StateKey {
    pub fn new(board: &Board, mover: Player) -> Self {
        StateKey {
            own: board.bits(mover),
            other: board.bits(mover.other()),
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.own, self.other)
    }
}

/// Opening learner settings (TOML section `opening`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OpeningConfig {
    pub enabled: bool,
    /// Moves are recorded while the board holds at most this many pieces.
    pub book_depth: usize,
    pub win_reward: f64,
    pub loss_reward: f64,
    /// Between loss and zero, so drawn lines are discouraged.
    pub draw_reward: f64,
    /// Visits needed at a state before any suggestion is made.
    pub min_total_visits: u64,
    /// UCB1 exploration constant.
    pub exploration: f64,
    /// Suggestions averaging below this are left to the search.
    pub safety_floor: f64,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        OpeningConfig {
            enabled: true,
            book_depth: 10,
            win_reward: 100.0,
            loss_reward: -100.0,
            draw_reward: -20.0,
            min_total_visits: 5,
            exploration: 1.0,
            safety_floor: -10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct BookMove {
    state: StateKey,
    column: usize,
    mover: Player,
}

/// Per-match opening learner: an in-memory trajectory for the current game
/// plus persisted statistics in a [`Store`].
#[derive(Debug, Clone)]
pub struct OpeningBook {
    config: OpeningConfig,
    trajectory: Vec<BookMove>,
}

impl OpeningBook {
    pub fn new(config: OpeningConfig) -> Self {
        OpeningBook {
            config,
            trajectory: Vec::new(),
        }
    }

    pub fn config(&self) -> &OpeningConfig {
        &self.config
    }

    /// Remember `mover` dropping into `column` on `before`, if still in book depth.
    pub fn record_move(&mut self, before: &Board, column: usize, mover: Player) {
        if !self.config.enabled || before.counter() > self.config.book_depth {
            return;
        }
        self.trajectory.push(BookMove {
            state: StateKey::new(before, mover),
            column,
            mover,
        });
    }

    pub fn trajectory_len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn clear_trajectory(&mut self) {
        self.trajectory.clear();
    }

    /// Back-propagate the outcome over the recorded trajectory and clear it.
    ///
    /// Returns the number of (state, column) updates written.
    pub fn finalize_game(
        &mut self,
        winner: Option<Player>,
        store: &mut dyn Store,
    ) -> Result<usize, StoreError> {
        let moves = std::mem::take(&mut self.trajectory);
        for m in &moves {
            let reward = match winner {
                None => self.config.draw_reward,
                Some(w) if w == m.mover => self.config.win_reward,
                Some(_) => self.config.loss_reward,
            };
            store.update_opening_move(&m.state.to_string(), m.column, reward)?;
        }
        if !moves.is_empty() {
            log::debug!("opening book updated {} moves", moves.len());
        }
        Ok(moves.len())
    }

    /// UCB1 choice among the book moves known for this position, or `None`
    /// when the book is not confident enough or the best move is poor.
    pub fn get_best_move(
        &self,
        board: &Board,
        mover: Player,
        store: &dyn Store,
    ) -> Result<Option<usize>, StoreError> {
        if !self.config.enabled {
            return Ok(None);
        }
        let state = StateKey::new(board, mover);
        let stats: Vec<_> = store
            .opening_stats(&state.to_string())?
            .into_iter()
            .filter(|s| s.visits > 0 && board.is_valid_location(s.column))
            .collect();

        let total: u64 = stats.iter().map(|s| s.visits).sum();
        if total < self.config.min_total_visits {
            return Ok(None);
        }

        let span = self.config.win_reward - self.config.loss_reward;
        let ln_total = (total as f64).ln();
        let mut best: Option<(f64, usize, f64)> = None;
        for s in &stats {
            let avg = s.average();
            let normalized = if span > 0.0 {
                (avg - self.config.loss_reward) / span
            } else {
                0.0
            };
            let ucb = normalized + self.config.exploration * (ln_total / s.visits as f64).sqrt();
            if best.map_or(true, |(b, _, _)| ucb > b) {
                best = Some((ucb, s.column, avg));
            }
        }

        Ok(match best {
            Some((_, column, avg)) if avg >= self.config.safety_floor => {
                log::debug!("book move {column} at {state} (avg reward {avg:.1})");
                Some(column)
            }
            _ => None,
        })
    }
}
