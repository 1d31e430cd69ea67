use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use adaptive_connect_four::ai::{AdaptiveAgent, BotKind};
use adaptive_connect_four::config::AppConfig;
use adaptive_connect_four::session::{run_session, SessionConfig, SessionSummary};
use adaptive_connect_four::store::{JsonStore, MemoryStore, Store};

/// Benchmark the adaptive player against every training bot.
#[derive(Parser)]
#[command(
    name = "adaptive_connect_four",
    about = "Benchmark the adaptive Connect Four player against the training bots"
)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of games per opponent
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

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
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

    let summaries = if config.store.enabled {
        let mut store = JsonStore::open(config.store.path.clone())
            .with_context(|| format!("opening store {}", config.store.path.display()))?;
        benchmark(&config, &mut store)?
    } else {
        benchmark(&config, &mut MemoryStore::new())?
    };

    print_table(&summaries);
    Ok(())
}

/// One session per bot, all sharing `store`.
fn benchmark<S: Store>(config: &AppConfig, store: &mut S) -> Result<Vec<SessionSummary>> {
    let mut summaries = Vec::with_capacity(BotKind::ALL.len());
    for (i, kind) in BotKind::ALL.into_iter().enumerate() {
        let session = SessionConfig {
            opponent: kind.key().to_string(),
            seed: config.session.seed.map(|s| s.wrapping_add(i as u64)),
            ..config.session.clone()
        };
        let mut agent = AdaptiveAgent::new(kind.key(), &mut *store, config.adaptive_config());
        let mut bot = kind.build(session.seed);
        let summary = run_session(&session, &mut agent, bot.as_mut())
            .with_context(|| format!("session against {kind}"))?;
        summaries.push(summary);
    }
    Ok(summaries)
}

fn print_table(summaries: &[SessionSummary]) {
    println!();
    println!(
        "{:<12} | {:>5} | {:>6} | {:>5} | {:>6} | {:>7}",
        "opponent", "wins", "losses", "draws", "% win", "avg len"
    );
    println!("{}", "-".repeat(58));

    let (mut games, mut wins, mut losses, mut draws) = (0, 0, 0, 0);
    let mut moves = 0.0;
    for s in summaries {
        println!(
            "{:<12} | {:>5} | {:>6} | {:>5} | {:>5.1}% | {:>7.1}",
            s.opponent,
            s.wins,
            s.losses,
            s.draws,
            s.win_rate() * 100.0,
            s.average_length
        );
        games += s.games;
        wins += s.wins;
        losses += s.losses;
        draws += s.draws;
        moves += s.average_length * s.games as f64;
    }

    println!("{}", "-".repeat(58));
    let (rate, avg) = if games == 0 {
        (0.0, 0.0)
    } else {
        (wins as f64 / games as f64 * 100.0, moves / games as f64)
    };
    println!(
        "{:<12} | {:>5} | {:>6} | {:>5} | {:>5.1}% | {:>7.1}",
        "total", wins, losses, draws, rate, avg
    );

    for s in summaries {
        println!("{:<12} biases: {}", s.opponent, s.final_biases);
    }
}
