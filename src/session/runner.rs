use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ai::{AdaptiveAgent, Agent, BiasVector};
use crate::error::SessionError;
use crate::game::Player;
use crate::store::{GameResult, Store};

use super::episode::play_game;
use super::metrics::SessionMetrics;

/// Headless session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub games: usize,
    pub log_interval: usize,
    /// Bot key the `train` binary plays against.
    pub opponent: String,
    /// Fixes who starts the first game and the random bot's moves.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            games: 20,
            log_interval: 10,
            opponent: "diagonal".into(),
            seed: None,
        }
    }
}

/// What one session achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub opponent: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub average_length: f64,
    pub book_moves: usize,
    pub final_biases: BiasVector,
}

impl SessionSummary {
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// Play `config.games` games of `agent` (always Red) against `bot`.
///
/// The first starter is drawn at random and the starter alternates after
/// every game. The store is flushed once the last game is over.
pub fn run_session<S: Store>(
    config: &SessionConfig,
    agent: &mut AdaptiveAgent<S>,
    bot: &mut dyn Agent,
) -> Result<SessionSummary, SessionError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut starter = if rng.random_bool(0.5) {
        Player::Red
    } else {
        Player::Yellow
    };
    let window = config.log_interval.max(1);
    let mut metrics = SessionMetrics::with_capacity(window);
    let mut totals = SessionMetrics::with_capacity(1);

    log::info!(
        "session: {} games, {} vs {}",
        config.games,
        agent.name(),
        bot.name()
    );

    for game in 1..=config.games {
        let episode = play_game(agent, bot, starter)?;
        let result = match episode.winner {
            Some(Player::Red) => GameResult::Win,
            Some(Player::Yellow) => GameResult::Loss,
            None => GameResult::Draw,
        };
        metrics.record(result, episode.game_length);
        totals.record(result, episode.game_length);

        log::info!(
            "game {game}/{} | {} started | {result} in {} moves | biases {}",
            config.games,
            if starter == Player::Red { agent.name() } else { bot.name() },
            episode.game_length,
            agent.profiler().biases()
        );
        if game % window == 0 {
            log::info!(
                "last {}: win {:.1}% | loss {:.1}% | draw {:.1}% | avg_len {:.1}",
                window,
                metrics.win_rate(window) * 100.0,
                metrics.loss_rate(window) * 100.0,
                metrics.draw_rate(window) * 100.0,
                metrics.average_game_length(window)
            );
        }

        starter = starter.other();
    }

    if let Err(e) = agent.store_mut().flush() {
        log::warn!("failed to flush store: {e}");
    }

    Ok(SessionSummary {
        opponent: agent.opponent().to_string(),
        games: totals.total_games(),
        wins: totals.wins(),
        losses: totals.losses(),
        draws: totals.draws(),
        average_length: totals.lifetime_average_length(),
        book_moves: agent.book_moves(),
        final_biases: *agent.profiler().biases(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AdaptiveConfig, BotKind, RandomAgent, SearchConfig};
    use crate::store::MemoryStore;

    fn shallow(depth: u32) -> AdaptiveConfig {
        AdaptiveConfig {
            search: SearchConfig {
                depth,
                use_transposition: true,
            },
            ..AdaptiveConfig::default()
        }
    }

    fn config(games: usize, seed: u64) -> SessionConfig {
        SessionConfig {
            games,
            log_interval: 2,
            opponent: "random".into(),
            seed: Some(seed),
        }
    }

    #[test]
    fn test_session_counts_and_persists_every_game() {
        let mut agent = AdaptiveAgent::new("random", MemoryStore::new(), shallow(2));
        let mut bot = RandomAgent::with_seed(3);
        let summary = run_session(&config(6, 11), &mut agent, &mut bot).unwrap();

        assert_eq!(summary.opponent, "random");
        assert_eq!(summary.games, 6);
        assert_eq!(summary.wins + summary.losses + summary.draws, 6);
        assert!(summary.average_length >= 7.0);

        let history = agent.store().game_summary("random").unwrap();
        assert_eq!(history.games, 6);
        assert_eq!(history.wins, summary.wins);
    }

    #[test]
    fn test_search_beats_random_play() {
        let mut agent = AdaptiveAgent::new("random", MemoryStore::new(), shallow(3));
        let mut bot = RandomAgent::with_seed(8);
        let summary = run_session(&config(10, 5), &mut agent, &mut bot).unwrap();
        assert!(summary.wins >= 8, "only {} wins", summary.wins);
        assert!(summary.win_rate() >= 0.8);
    }

    #[test]
    fn test_biases_stay_in_range_against_a_bot() {
        let mut agent = AdaptiveAgent::new("casual", MemoryStore::new(), shallow(2));
        let mut bot = BotKind::Casual.build(None);
        let summary = run_session(&config(4, 1), &mut agent, bot.as_mut()).unwrap();
        let cfg = agent.profiler().config();
        for (kind, value) in summary.final_biases.iter() {
            assert!(
                (cfg.min_bias..=cfg.max_bias).contains(&value),
                "{kind} = {value}"
            );
        }
    }

    #[test]
    fn test_zero_games() {
        let mut agent = AdaptiveAgent::new("random", MemoryStore::new(), shallow(1));
        let mut bot = RandomAgent::with_seed(1);
        let summary = run_session(&config(0, 1), &mut agent, &mut bot).unwrap();
        assert_eq!(summary.games, 0);
        assert_eq!(summary.win_rate(), 0.0);
    }
}
