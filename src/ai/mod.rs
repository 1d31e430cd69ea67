mod adaptive;
mod agent;
pub mod analysis;
mod bots;
mod evaluator;
mod opening;
mod profiler;
mod random;
mod search;
mod transposition;

pub use adaptive::{AdaptiveAgent, AdaptiveConfig};
pub use agent::Agent;
pub use bots::{BotKind, TrainingEvaluator, TrainingWeights};
pub use evaluator::{AdaptiveEvaluator, EvalConfig, Heuristic, WIN_SCORE};
pub use opening::{OpeningBook, OpeningConfig, StateKey};
pub use profiler::{BiasKind, BiasVector, OpponentProfiler, ProfilerConfig, ProfilerStats};
pub use random::RandomAgent;
pub use search::{MinimaxAgent, SearchConfig, SearchEngine, SearchResult, SearchStats};
pub use transposition::{Bound, TranspositionTable, TtEntry};
