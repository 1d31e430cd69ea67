use super::agent::Agent;
use super::analysis::threat_mask;
use super::evaluator::{AdaptiveEvaluator, EvalConfig};
use super::opening::{OpeningBook, OpeningConfig};
use super::profiler::{OpponentProfiler, ProfilerConfig};
use super::search::{SearchConfig, SearchEngine, SearchStats};
use crate::game::{Board, GameOutcome, GameState, Player, BOARD_MASK};
use crate::store::{GameResult, Store};

/// Everything the adaptive player is tuned by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdaptiveConfig {
    pub search: SearchConfig,
    pub eval: EvalConfig,
    pub profiler: ProfilerConfig,
    pub opening: OpeningConfig,
}

/// The learning player: one profiler, search engine and opening book per
/// match, backed by a store that outlives the match.
///
/// Storage failures are logged and never interrupt play: the agent falls
/// back to neutral biases and plain search.
pub struct AdaptiveAgent<S: Store> {
    opponent: String,
    store: S,
    eval: EvalConfig,
    profiler: OpponentProfiler,
    engine: SearchEngine,
    book: OpeningBook,
    side: Option<Player>,
    moves_played: usize,
    book_moves: usize,
}

impl<S: Store> AdaptiveAgent<S> {
    /// Build an agent for `opponent`, resuming its last saved profile.
    pub fn new(opponent: impl Into<String>, store: S, config: AdaptiveConfig) -> Self {
        let opponent = opponent.into();
        let profiler = match store.latest_biases(&opponent) {
            Ok(Some(biases)) => {
                log::info!("resuming profile for '{opponent}': {biases}");
                OpponentProfiler::with_biases(config.profiler, biases)
            }
            Ok(None) => OpponentProfiler::new(config.profiler),
            Err(e) => {
                log::warn!("could not load profile for '{opponent}', starting neutral: {e}");
                OpponentProfiler::new(config.profiler)
            }
        };
        AdaptiveAgent {
            opponent,
            store,
            eval: config.eval,
            profiler,
            engine: SearchEngine::new(config.search),
            book: OpeningBook::new(config.opening),
            side: None,
            moves_played: 0,
            book_moves: 0,
        }
    }

    pub fn opponent(&self) -> &str {
        &self.opponent
    }

    pub fn profiler(&self) -> &OpponentProfiler {
        &self.profiler
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Moves taken from the opening book since the agent was built.
    pub fn book_moves(&self) -> usize {
        self.book_moves
    }

    pub fn search_stats(&self) -> SearchStats {
        self.engine.stats()
    }

    /// Book suggestion, unless the opponent has a winning drop available
    /// or the suggested drop would open one.
    fn book_move(&mut self, board: &Board, me: Player) -> Option<usize> {
        let opp_threats = threat_mask(board.bits(me.other()), board.occupied());
        if opp_threats & board.playable_mask() != 0 {
            return None;
        }
        match self.book.get_best_move(board, me, &self.store) {
            Ok(Some(column)) => {
                let exposes = board
                    .landing_bit(column)
                    .is_some_and(|bit| (bit << 1) & BOARD_MASK & opp_threats != 0);
                if exposes {
                    log::debug!("book move {column} rejected: lands under an enemy threat");
                    return None;
                }
                self.book_moves += 1;
                Some(column)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("opening book unavailable: {e}");
                None
            }
        }
    }
}

impl<S: Store> Agent for AdaptiveAgent<S> {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }
        let me = state.current_player();
        self.side = Some(me);
        let mut board = *state.board();

        if let Some(column) = board
            .legal_columns()
            .into_iter()
            .find(|&col| board.is_winning_move(col, me))
        {
            return Some(column);
        }

        if let Some(column) = self.book_move(&board, me) {
            return Some(column);
        }

        let evaluator = AdaptiveEvaluator::new(self.eval.clone(), self.profiler.adaptive_weights());
        self.engine.choose_move(&mut board, me, &evaluator)
    }

    fn name(&self) -> &str {
        "Adaptive"
    }

    fn game_start(&mut self, me: Player) {
        self.side = Some(me);
        self.moves_played = 0;
        self.book.clear_trajectory();
    }

    fn observe(&mut self, before: &Board, column: usize, mover: Player) {
        self.moves_played += 1;
        self.book.record_move(before, column, mover);
        if self.side.is_some_and(|me| me != mover) {
            self.profiler.update(before, column, mover);
        }
    }

    fn game_over(&mut self, outcome: GameOutcome, me: Player) {
        let result = match outcome {
            GameOutcome::Winner(p) if p == me => GameResult::Win,
            GameOutcome::Winner(_) => GameResult::Loss,
            GameOutcome::Draw => GameResult::Draw,
        };
        if result == GameResult::Loss {
            self.profiler.cooling_after_loss();
        }

        if let Err(e) = self.book.finalize_game(outcome.winner(), &mut self.store) {
            log::warn!("failed to update opening book: {e}");
        }
        if let Err(e) = self.store.save_game_result(
            &self.opponent,
            result,
            self.profiler.biases(),
            self.moves_played,
        ) {
            log::warn!("failed to save game result: {e}");
        }

        log::debug!(
            "game vs '{}' ended: {result} after {} moves, biases {}",
            self.opponent,
            self.moves_played,
            self.profiler.biases()
        );
        self.moves_played = 0;
        self.side = None;
    }
}
