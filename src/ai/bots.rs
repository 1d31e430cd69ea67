//! Sparring partners with deliberate, known weaknesses.

use std::fmt;
use std::str::FromStr;

use super::agent::Agent;
use super::analysis::{center_count, direction_patterns, Direction};
use super::evaluator::{Heuristic, WIN_SCORE};
use super::random::RandomAgent;
use super::search::{MinimaxAgent, SearchConfig};
use crate::game::{Board, Player};

const SCORE_THREE: f64 = 5.0;
const SCORE_TWO: f64 = 2.0;
const SCORE_CENTER: f64 = 3.0;
const DEFENSE_THREE: f64 = 4.0;

/// Attack and defense multipliers per direction plus a center multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingWeights {
    pub vertical_attack: f64,
    pub vertical_defense: f64,
    pub horizontal_attack: f64,
    pub horizontal_defense: f64,
    pub diagonal_attack: f64,
    pub diagonal_defense: f64,
    pub center_bias: f64,
}

impl TrainingWeights {
    fn for_direction(&self, dir: Direction) -> (f64, f64) {
        match dir {
            Direction::Vertical => (self.vertical_attack, self.vertical_defense),
            Direction::Horizontal => (self.horizontal_attack, self.horizontal_defense),
            Direction::DiagonalDown | Direction::DiagonalUp => {
                (self.diagonal_attack, self.diagonal_defense)
            }
        }
    }
}

impl Default for TrainingWeights {
    fn default() -> Self {
        TrainingWeights {
            vertical_attack: 1.0,
            vertical_defense: 1.0,
            horizontal_attack: 1.0,
            horizontal_defense: 1.0,
            diagonal_attack: 1.0,
            diagonal_defense: 1.0,
            center_bias: 1.0,
        }
    }
}

/// Small, novice-grade evaluator. Only the weights differ between bots.
#[derive(Debug, Clone)]
pub struct TrainingEvaluator {
    name: &'static str,
    weights: TrainingWeights,
}

impl TrainingEvaluator {
    pub fn new(name: &'static str, weights: TrainingWeights) -> Self {
        TrainingEvaluator { name, weights }
    }

    pub fn weights(&self) -> &TrainingWeights {
        &self.weights
    }
}

impl Heuristic for TrainingEvaluator {
    fn evaluate(&self, board: &Board, player: Player) -> f64 {
        let own = board.bits(player);
        let opp = board.bits(player.other());
        if Board::has_four(own) {
            return WIN_SCORE;
        }
        if Board::has_four(opp) {
            return -WIN_SCORE;
        }

        let occupied = own | opp;
        let mut score = center_count(own) as f64 * SCORE_CENTER * self.weights.center_bias;
        for dir in Direction::ALL {
            let (attack, defense) = self.weights.for_direction(dir);
            let mine = direction_patterns(own, occupied, dir);
            let theirs = direction_patterns(opp, occupied, dir);
            let pairs = mine.double_open_pairs + mine.single_open_pairs;
            score += (mine.threes as f64 * SCORE_THREE + pairs as f64 * SCORE_TWO) * attack;
            score -= theirs.threes as f64 * DEFENSE_THREE * defense;
        }
        score
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Built-in opponents the adaptive player trains against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotKind {
    /// Plain novice weights, shallow search.
    Casual,
    /// Barely defends diagonals.
    DiagonalBlinder,
    /// Avoids the center column.
    EdgeRunner,
    Random,
}

impl BotKind {
    pub const ALL: [BotKind; 4] = [
        BotKind::Casual,
        BotKind::DiagonalBlinder,
        BotKind::EdgeRunner,
        BotKind::Random,
    ];

    /// Stable identifier, used as the store's opponent key.
    pub fn key(self) -> &'static str {
        match self {
            BotKind::Casual => "casual",
            BotKind::DiagonalBlinder => "diagonal",
            BotKind::EdgeRunner => "edge",
            BotKind::Random => "random",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BotKind::Casual => "Casual",
            BotKind::DiagonalBlinder => "DiagonalBlinder",
            BotKind::EdgeRunner => "EdgeRunner",
            BotKind::Random => "Random",
        }
    }

    pub fn depth(self) -> u32 {
        match self {
            BotKind::Casual => 2,
            BotKind::DiagonalBlinder => 4,
            BotKind::EdgeRunner => 3,
            BotKind::Random => 0,
        }
    }

    pub fn weights(self) -> TrainingWeights {
        match self {
            BotKind::DiagonalBlinder => TrainingWeights {
                diagonal_defense: 0.25,
                ..TrainingWeights::default()
            },
            BotKind::EdgeRunner => TrainingWeights {
                center_bias: -20.0,
                ..TrainingWeights::default()
            },
            BotKind::Casual | BotKind::Random => TrainingWeights::default(),
        }
    }

    /// Create the agent. `seed` only affects the random bot.
    pub fn build(self, seed: Option<u64>) -> Box<dyn Agent> {
        match self {
            BotKind::Random => Box::new(match seed {
                Some(s) => RandomAgent::with_seed(s),
                None => RandomAgent::new(),
            }),
            kind => Box::new(MinimaxAgent::new(
                kind.display_name(),
                SearchConfig {
                    depth: kind.depth(),
                    use_transposition: true,
                },
                TrainingEvaluator::new(kind.display_name(), kind.weights()),
            )),
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for BotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "casual" | "novice" => Ok(BotKind::Casual),
            "diagonal" | "diagonal-blinder" | "diagonalblinder" => Ok(BotKind::DiagonalBlinder),
            "edge" | "edge-runner" | "edgerunner" => Ok(BotKind::EdgeRunner),
            "random" => Ok(BotKind::Random),
            other => Err(format!(
                "unknown opponent '{other}' (expected casual, diagonal, edge or random)"
            )),
        }
    }
}
