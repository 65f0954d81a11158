//! Arena Shooter headless driver
//!
//! Runs one seeded autoplay session at a fixed frame step and prints the
//! result. Useful for balance checks and reproducing runs from a config file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use arena_shooter::sim::{Session, SessionPhase};
use arena_shooter::{ArenaConfig, FeedbackPort, HapticLog, HighScores, SessionSink};

/// Frame step fed to the session (~60 FPS)
const FRAME_MS: u64 = 16;

#[derive(Parser, Debug)]
#[command(name = "arena-shooter")]
#[command(about = "Headless autoplay for the arena-shooter simulation core")]
struct Cli {
    /// Arena config JSON (missing fields take defaults)
    config: Option<PathBuf>,
    /// Override the config's RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
    /// Frames between autoplay taps
    #[arg(long, default_value_t = 6)]
    tap_every: u64,
    /// Stop runs that outlast this much play time
    #[arg(long, default_value_t = 600)]
    max_seconds: u64,
    /// Number of consecutive games to play
    #[arg(long, default_value_t = 1)]
    games: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            ArenaConfig::read(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => ArenaConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    if cli.dump_config {
        println!("{}", config.to_json().context("serializing config")?);
        return Ok(());
    }

    log::info!("Arena Shooter (headless) starting, seed {}", config.seed);
    let mut session = Session::with_ports(config, HighScores::new(), HapticLog::new());
    let max_play_ms = cli.max_seconds.saturating_mul(1000);
    let tap_every = cli.tap_every.max(1);

    for game in 1..=cli.games {
        session.start_game();
        let mut frame: u64 = 0;
        while session.phase() == SessionPhase::Playing && session.elapsed_ms() < max_play_ms {
            if frame % tap_every == 0 {
                if let Some((dx, dy)) = pick_target(&session) {
                    session.fire(dx, dy);
                }
            }
            session.advance(FRAME_MS);
            frame += 1;
        }

        // Out of time still counts as a finished game
        let timed_out = session.phase() == SessionPhase::Playing;
        session.end_game();

        let stats = session.stats();
        println!(
            "Game {}: score {}, {} kills, {}/{} hits, level {}, {:.1}s{}",
            game,
            session.score(),
            stats.kills,
            stats.hits,
            stats.shots_fired,
            session.difficulty().level,
            session.elapsed_ms() as f64 / 1000.0,
            if timed_out { " (time limit)" } else { "" }
        );
    }

    let scores = session.sink();
    println!("Games recorded: {}", scores.stats.total_games);
    println!("Best score:     {}", scores.stats.high_score);
    println!("Haptics:        {}ms", session.feedback().total_ms());

    Ok(())
}

/// Aim at the active enemy closest to the player
fn pick_target<S: SessionSink, F: FeedbackPort>(session: &Session<S, F>) -> Option<(f32, f32)> {
    session
        .enemies()
        .iter()
        .filter(|e| !e.is_spawning())
        .min_by(|a, b| a.pos.length_squared().total_cmp(&b.pos.length_squared()))
        .map(|e| (e.pos.x, e.pos.y))
}
