//! # Adaptive Connect Four
//!
//! A Connect Four engine that studies its opponent. Every opponent move is
//! checked for tactical mistakes, the mistakes shift a bias vector, and the
//! biases steer the evaluator of a minimax search toward the lines the
//! opponent defends worst. A UCB1 opening book learns which early moves
//! pay off, and both the profile and the book persist between sessions.
//!
//! ## Modules
//!
//! - [`game`] - Bitboard board, players and the turn-level game state
//! - [`ai`] - Pattern analysis, evaluators, profiler, search, opening book, agents
//! - [`store`] - Game history and opening statistics, in memory or on disk
//! - [`session`] - Headless games and multi-game sessions against training bots
//! - [`config`] - TOML configuration loading and validation
//! - [`error`] - Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod store;
