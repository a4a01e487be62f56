//! Triomino batch match simulator.
//!
//! Runs a series of seeded matches between configured strategies, logs each
//! result, prints aggregate statistics and optionally persists a JSON run
//! log. Configuration comes from the environment:
//!
//! - `SIM_MATCHES`: number of matches (default 10)
//! - `SIM_PLAYERS`: players per match, 2-6 (default 2)
//! - `SIM_STRATEGIES`: comma-separated kinds, e.g. `greedy,random`
//!   (default: greedy for every seat)
//! - `SIM_SEED`: base seed; match i runs with seed base + i (default: random)
//! - `SIM_TARGET_SCORE`: final-round trigger (default 400)
//! - `SIM_LOG_DIR`: write a JSON run log here (default: no log)

use anyhow::{bail, Context};
use rand::Rng;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triomino_core::{
    run_to_completion, MatchConfig, MatchState, Strategy, StrategyKind, TARGET_SCORE,
};

mod stats;

use stats::{RunEntry, RunLog, SimStats};

struct SimSettings {
    matches: u32,
    player_count: u8,
    strategies: Vec<StrategyKind>,
    base_seed: u64,
    target_score: i32,
    log_dir: Option<PathBuf>,
}

fn env_or<T: FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw}: {e}")),
        Err(_) => Ok(default),
    }
}

fn load_settings() -> anyhow::Result<SimSettings> {
    let matches = env_or("SIM_MATCHES", 10u32)?;
    let player_count = env_or("SIM_PLAYERS", 2u8)?;
    if !(2..=6).contains(&player_count) {
        bail!("SIM_PLAYERS must be 2-6, got {player_count}");
    }

    let strategies: Vec<StrategyKind> = match std::env::var("SIM_STRATEGIES") {
        Ok(raw) => raw
            .split(',')
            .map(|name| {
                StrategyKind::from_str(name.trim()).map_err(|e| anyhow::anyhow!(e))
            })
            .collect::<anyhow::Result<_>>()?,
        Err(_) => vec![StrategyKind::Greedy; player_count as usize],
    };
    if strategies.len() != player_count as usize {
        bail!(
            "SIM_STRATEGIES lists {} strategies for {player_count} players",
            strategies.len()
        );
    }

    let base_seed = match std::env::var("SIM_SEED") {
        Ok(raw) => raw.parse().context("invalid SIM_SEED")?,
        Err(_) => rand::thread_rng().gen(),
    };

    Ok(SimSettings {
        matches,
        player_count,
        strategies,
        base_seed,
        target_score: env_or("SIM_TARGET_SCORE", TARGET_SCORE)?,
        log_dir: std::env::var("SIM_LOG_DIR").ok().map(PathBuf::from),
    })
}

fn player_names(settings: &SimSettings) -> Vec<String> {
    settings
        .strategies
        .iter()
        .enumerate()
        .map(|(i, kind)| format!("CPU-{} ({kind:?})", i + 1))
        .collect()
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = load_settings()?;
    let names = player_names(&settings);

    info!(
        matches = settings.matches,
        players = settings.player_count,
        base_seed = settings.base_seed,
        target = settings.target_score,
        "starting simulation"
    );

    let mut stats = SimStats::default();
    let mut results = Vec::with_capacity(settings.matches as usize);

    for i in 0..settings.matches {
        let seed = settings.base_seed.wrapping_add(u64::from(i));

        let mut config = MatchConfig::new(settings.player_count, seed);
        config.target_score = settings.target_score;
        config.player_names = names.clone();
        let mut state = MatchState::new(config);

        let mut strategies: Vec<Strategy> = settings
            .strategies
            .iter()
            .enumerate()
            .map(|(seat, &kind)| {
                Strategy::with_seed(kind, seed.wrapping_add(seat as u64 + 1))
            })
            .collect();

        let report = run_to_completion(&mut state, &mut strategies)
            .with_context(|| format!("match {} (seed {seed}) failed", i + 1))?;

        let winner_names: Vec<String> = report
            .outcome
            .winners
            .iter()
            .map(|w| names[*w as usize].clone())
            .collect();
        info!(
            number = i + 1,
            seed,
            rounds = report.outcome.rounds_played,
            turns = report.outcome.turns_played,
            scores = ?report.outcome.final_scores,
            winners = ?winner_names,
            "match finished"
        );

        stats.update(&names, &report.outcome);
        results.push(RunEntry {
            seed,
            winners: winner_names,
            final_scores: report.outcome.final_scores.clone(),
            rounds_played: report.outcome.rounds_played,
            turns_played: report.outcome.turns_played,
        });
    }

    info!(
        matches = stats.total_matches,
        avg_rounds = format!("{:.1}", stats.avg_rounds()),
        tied = stats.tied_matches,
        highest_score = stats.highest_score,
        highest_scorer = %stats.highest_scorer,
        "simulation complete"
    );
    let mut standings: Vec<(&String, &u32)> = stats.wins_per_player.iter().collect();
    standings.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (name, wins) in standings {
        let pct = 100.0 * f64::from(*wins) / f64::from(stats.total_matches.max(1));
        info!("  {name}: {wins} wins ({pct:.1}%)");
    }

    if let Some(dir) = &settings.log_dir {
        let log = RunLog {
            matches: settings.matches,
            base_seed: settings.base_seed,
            players: names,
            strategies: settings
                .strategies
                .iter()
                .map(|k| format!("{k:?}").to_lowercase())
                .collect(),
            target_score: settings.target_score,
            stats: stats.clone(),
            results,
        };
        let path = log.write_to(dir)?;
        info!(path = %path.display(), "run log written");
    }

    Ok(())
}
