use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::evaluator::{Heuristic, WIN_SCORE};
use super::transposition::{Bound, TranspositionTable, TtEntry};
use crate::game::{Board, GameState, Player};

/// Search settings (TOML section `search`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched below the root. 0 scores each candidate statically.
    pub depth: u32,
    pub use_transposition: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 4,
            use_transposition: true,
        }
    }
}

/// Counters for the most recent decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
    pub cutoffs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub column: usize,
    pub score: f64,
    /// The column wins on the spot; no tree was searched.
    pub immediate_win: bool,
}

/// Minimax with alpha-beta pruning and a per-decision transposition table.
///
/// One engine per match. The table is keyed only by board bits, so it must
/// not be shared between games evaluated under different bias snapshots.
#[derive(Debug, Default)]
pub struct SearchEngine {
    config: SearchConfig,
    table: TranspositionTable,
    stats: SearchStats,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        SearchEngine {
            config,
            table: TranspositionTable::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Best column for `player`, or `None` when the board has no legal column.
    pub fn choose_move(
        &mut self,
        board: &mut Board,
        player: Player,
        heuristic: &dyn Heuristic,
    ) -> Option<usize> {
        self.analyze(board, player, heuristic).map(|r| r.column)
    }

    /// Like [`choose_move`](Self::choose_move) but also reports the root score.
    ///
    /// The board is mutated during the search and restored before returning.
    pub fn analyze(
        &mut self,
        board: &mut Board,
        player: Player,
        heuristic: &dyn Heuristic,
    ) -> Option<SearchResult> {
        self.table.clear();
        self.stats = SearchStats::default();

        let legal = board.legal_columns();
        let first = *legal.first()?;

        let depth = self.config.depth;
        if let Some(&column) = legal.iter().find(|&&c| board.is_winning_move(c, player)) {
            return Some(SearchResult {
                column,
                score: WIN_SCORE + depth as f64,
                immediate_win: true,
            });
        }

        let child_depth = depth.saturating_sub(1);
        let mut alpha = f64::NEG_INFINITY;
        let mut best = SearchResult {
            column: first,
            score: f64::NEG_INFINITY,
            immediate_win: false,
        };

        for &col in &legal {
            let snapshot = board.snapshot();
            board.drop_unchecked(col, player);
            let score = self.minimax(
                board,
                child_depth,
                false,
                alpha,
                f64::INFINITY,
                player,
                heuristic,
            );
            board.restore(snapshot);

            if score > best.score {
                best.score = score;
                best.column = col;
            }
            alpha = alpha.max(best.score);
        }

        log::trace!(
            "search depth {depth}: column {} score {} ({} nodes, {} tt hits, {} cutoffs)",
            best.column,
            best.score,
            self.stats.nodes,
            self.stats.tt_hits,
            self.stats.cutoffs
        );
        Some(best)
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
        root: Player,
        heuristic: &dyn Heuristic,
    ) -> f64 {
        self.stats.nodes += 1;
        let key = board.key();

        if self.config.use_transposition {
            if let Some(entry) = self.table.probe(key, depth) {
                self.stats.tt_hits += 1;
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    return entry.score;
                }
            }
        }

        // Prefer quick wins and slow losses.
        if board.check_victory(root) {
            return WIN_SCORE + depth as f64;
        }
        if board.check_victory(root.other()) {
            return -(WIN_SCORE + depth as f64);
        }
        if depth == 0 {
            return heuristic.evaluate(board, root);
        }

        let legal = board.legal_columns();
        if legal.is_empty() {
            return 0.0;
        }

        // Bounds are classified against the window actually searched.
        let (window_alpha, window_beta) = (alpha, beta);
        let mover = if maximizing { root } else { root.other() };
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for col in legal {
            let snapshot = board.snapshot();
            board.drop_unchecked(col, mover);
            let score = self.minimax(board, depth - 1, !maximizing, alpha, beta, root, heuristic);
            board.restore(snapshot);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        if self.config.use_transposition {
            let bound = if best <= window_alpha {
                Bound::Upper
            } else if best >= window_beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.table.store(
                key,
                TtEntry {
                    score: best,
                    depth,
                    bound,
                },
            );
        }
        best
    }
}

/// Search agent with a fixed heuristic.
pub struct MinimaxAgent<H: Heuristic> {
    name: String,
    engine: SearchEngine,
    heuristic: H,
}

impl<H: Heuristic> MinimaxAgent<H> {
    pub fn new(name: impl Into<String>, config: SearchConfig, heuristic: H) -> Self {
        MinimaxAgent {
            name: name.into(),
            engine: SearchEngine::new(config),
            heuristic,
        }
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }
}

impl<H: Heuristic> Agent for MinimaxAgent<H> {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        let mut board = *state.board();
        self.engine
            .choose_move(&mut board, state.current_player(), &self.heuristic)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
