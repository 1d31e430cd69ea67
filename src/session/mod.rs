//! Headless play: single games, rolling metrics and multi-game sessions
//! between the adaptive player and a training bot.

mod episode;
mod metrics;
mod runner;

pub use episode::{play_game, EpisodeResult};
pub use metrics::SessionMetrics;
pub use runner::{run_session, SessionConfig, SessionSummary};
