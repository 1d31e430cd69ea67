use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use adaptive_connect_four::ai::{AdaptiveAgent, BotKind};
use adaptive_connect_four::config::AppConfig;
use adaptive_connect_four::session::{run_session, SessionSummary};
use adaptive_connect_four::store::{GameSummary, JsonStore, MemoryStore, Store};

/// Train the adaptive player against one training bot.
#[derive(Parser)]
#[command(name = "train", about = "Train the adaptive Connect Four player against a bot")]
struct Cli {
    /// Opponent: casual, diagonal, edge or random
    #[arg(long)]
    opponent: Option<BotKind>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of games
    #[arg(long)]
    games: Option<usize>,

    /// Override search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Override the store file
    #[arg(long)]
    store: Option<PathBuf>,

    /// Keep everything in memory; nothing learned is saved
    #[arg(long)]
    no_store: bool,

    /// Seed for the starting order and the random bot
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(opponent) = cli.opponent {
        config.session.opponent = opponent.key().to_string();
    }
    if let Some(games) = cli.games {
        config.session.games = games;
    }
    if let Some(depth) = cli.depth {
        config.search.depth = depth;
    }
    if let Some(path) = cli.store {
        config.store.path = path;
    }
    if cli.no_store {
        config.store.enabled = false;
    }
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }
    config.validate().context("invalid configuration")?;

    let kind: BotKind = config
        .session
        .opponent
        .parse()
        .map_err(anyhow::Error::msg)?;

    let (summary, history) = if config.store.enabled {
        let store = JsonStore::open(config.store.path.clone())
            .with_context(|| format!("opening store {}", config.store.path.display()))?;
        train(&config, kind, store)?
    } else {
        train(&config, kind, MemoryStore::new())?
    };

    report(&summary, &history);
    Ok(())
}

fn train<S: Store>(
    config: &AppConfig,
    kind: BotKind,
    store: S,
) -> Result<(SessionSummary, GameSummary)> {
    let mut agent = AdaptiveAgent::new(kind.key(), store, config.adaptive_config());
    let mut bot = kind.build(config.session.seed);

    println!(
        "Training against {} for {} games (depth {})",
        kind, config.session.games, config.search.depth
    );
    println!("Starting biases: {}", agent.profiler().biases());
    println!("-------------------------------------------");

    let summary = run_session(&config.session, &mut agent, bot.as_mut())
        .with_context(|| format!("session against {kind}"))?;
    let history = agent
        .store()
        .game_summary(kind.key())
        .context("reading game history")?;
    Ok((summary, history))
}

fn report(summary: &SessionSummary, history: &GameSummary) {
    println!("-------------------------------------------");
    println!(
        "This session: {} games | {} wins | {} losses | {} draws | win rate {:.1}% | avg len {:.1}",
        summary.games,
        summary.wins,
        summary.losses,
        summary.draws,
        summary.win_rate() * 100.0,
        summary.average_length
    );
    println!("Opening book moves played: {}", summary.book_moves);
    println!("Final biases: {}", summary.final_biases);
    println!(
        "All time vs {}: {} games | {} wins | {} losses | {} draws | win rate {:.1}% | avg len {:.1}",
        summary.opponent,
        history.games,
        history.wins,
        history.losses,
        history.draws,
        history.win_rate() * 100.0,
        history.average_moves
    );
}
