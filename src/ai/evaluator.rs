use serde::{Deserialize, Serialize};

use super::analysis::{center_count, direction_patterns, threat_mask, Direction, DirectionPatterns};
use super::profiler::BiasVector;
use crate::game::{Board, Player, BOARD_MASK, COLS};

/// Score of a decided position, before the search adds remaining depth.
pub const WIN_SCORE: f64 = 10_000_000.0;

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic: Send {
    fn evaluate(&self, board: &Board, player: Player) -> f64;

    fn name(&self) -> &str;
}

/// Pattern weights of the adaptive evaluator (TOML section `eval`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvalConfig {
    pub center: f64,
    pub pair_single: f64,
    pub pair_split: f64,
    pub pair_double: f64,
    pub three: f64,
    pub fork: f64,
    pub win: f64,
    /// Applied to the opponent's threes on top of `three`. Never biased.
    pub defense_multiplier: f64,
    /// Charged per enemy threat that is playable or sits right above a landing cell.
    pub blunder_penalty: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            center: 4.0,
            pair_single: 5.0,
            pair_split: 8.0,
            pair_double: 15.0,
            three: 50.0,
            fork: 5_000.0,
            win: WIN_SCORE,
            defense_multiplier: 20.0,
            blunder_penalty: 100_000.0,
        }
    }
}

/// Static scorer combining bitboard patterns with a snapshot of opponent biases.
///
/// Own attacking patterns are multiplied by the bias of their direction.
/// Opponent patterns are never biased, and opponent threes are additionally
/// scaled by `defense_multiplier` so a real threat outweighs any attacking bonus.
#[derive(Debug, Clone)]
pub struct AdaptiveEvaluator {
    config: EvalConfig,
    biases: BiasVector,
}

impl AdaptiveEvaluator {
    pub fn new(config: EvalConfig, biases: BiasVector) -> Self {
        AdaptiveEvaluator { config, biases }
    }

    pub fn biases(&self) -> &BiasVector {
        &self.biases
    }

    fn pair_score(&self, p: &DirectionPatterns) -> f64 {
        p.double_open_pairs as f64 * self.config.pair_double
            + p.single_open_pairs as f64 * self.config.pair_single
            + p.split_pairs as f64 * self.config.pair_split
    }

    fn attack_score(&self, p: &DirectionPatterns) -> f64 {
        p.threes as f64 * self.config.three + self.pair_score(p)
    }

    fn defense_score(&self, p: &DirectionPatterns) -> f64 {
        p.threes as f64 * self.config.three * self.config.defense_multiplier + self.pair_score(p)
    }

    /// Charge `blunder_penalty` for every enemy threat the opponent could
    /// reach on its next drop: threat cells that are playable right now, and
    /// landing cells sitting directly under one (dropping there hands the
    /// opponent the winning cell). Own threats never earn the penalty back.
    fn exposed_threats(&self, board: &Board, opp_threats: u64) -> f64 {
        let playable = board.playable_mask();
        let mut hits = (opp_threats & playable).count_ones();
        for col in 0..COLS {
            let Some(landing) = board.landing_bit(col) else {
                continue;
            };
            if (landing << 1) & BOARD_MASK & opp_threats != 0 {
                hits += 1;
            }
        }
        -(hits as f64) * self.config.blunder_penalty
    }
}

impl Heuristic for AdaptiveEvaluator {
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        let own = board.bits(player);
        let opp = board.bits(player.other());

        if Board::has_four(own) {
            return self.config.win;
        }
        if Board::has_four(opp) {
            return -self.config.win;
        }

        let occupied = own | opp;
        let mut score = center_count(own) as f64 * self.config.center * self.biases.center_weight
            - center_count(opp) as f64 * self.config.center;

        for dir in Direction::ALL {
            let mine = direction_patterns(own, occupied, dir);
            let theirs = direction_patterns(opp, occupied, dir);
            score += self.attack_score(&mine) * self.biases.for_direction(dir);
            score -= self.defense_score(&theirs);
        }

        let own_threats = threat_mask(own, occupied);
        let opp_threats = threat_mask(opp, occupied);
        if own_threats.count_ones() >= 2 {
            score += self.config.fork;
        }
        if opp_threats.count_ones() >= 2 {
            score -= self.config.fork;
        }

        score + self.exposed_threats(board, opp_threats)
    }

    fn name(&self) -> &str {
        "Adaptive"
    }
}
