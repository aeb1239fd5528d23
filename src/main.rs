//! Solid Asteroids entry point
//!
//! Headless runner: boots the simulation against a recording UI, lets the
//! autopilot play for a fixed amount of simulated time and prints a JSON
//! summary of the run.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use solid_asteroids::consts::SIM_DT;
use solid_asteroids::highscores::HighScoreEntry;
use solid_asteroids::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use solid_asteroids::ui::HeadlessUi;
use solid_asteroids::{Difficulty, Settings};

#[derive(Parser, Debug)]
#[command(name = "solid-asteroids")]
#[command(about = "Headless asteroids simulation played by the autopilot")]
struct Cli {
    /// Settings JSON; defaults are used when it is missing or invalid
    #[arg(default_value = "settings.json")]
    settings_path: PathBuf,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Override the settings seed
    #[arg(long)]
    seed: Option<u64>,
    /// Apply a difficulty preset on top of the settings
    #[arg(long, value_enum)]
    difficulty: Option<CliDifficulty>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliDifficulty {
    Easy,
    Normal,
    Hard,
}

impl From<CliDifficulty> for Difficulty {
    fn from(value: CliDifficulty) -> Self {
        match value {
            CliDifficulty::Easy => Difficulty::Easy,
            CliDifficulty::Normal => Difficulty::Normal,
            CliDifficulty::Hard => Difficulty::Hard,
        }
    }
}

/// What the runner prints when the simulated time is up
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    difficulty: &'static str,
    seconds: f32,
    ticks: u64,
    phase: GamePhase,
    level: u32,
    lives: u8,
    score: u64,
    games_played: u32,
    shots_fired: u32,
    asteroids_destroyed: u32,
    high_scores: Vec<HighScoreEntry>,
}

fn main() {
    env_logger::init();

    let args = Cli::parse();

    let mut settings = Settings::load_or_default(&args.settings_path);
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(difficulty) = args.difficulty {
        settings.apply_difficulty(difficulty.into());
    }
    log::info!(
        "Solid Asteroids starting (seed {:#x}, {})",
        settings.seed,
        settings.difficulty.as_str()
    );

    let mut ui = HeadlessUi::new(usize::from(solid_asteroids::consts::MAX_LIVES));
    let mut state = match GameState::boot(settings, &mut ui) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let total_ticks = (args.seconds / SIM_DT).ceil().max(0.0) as u64;

    let (mut games_played, mut shots_fired, mut asteroids_destroyed) = (0u32, 0u32, 0u32);
    for _ in 0..total_ticks {
        tick(&mut state, &input, SIM_DT, &mut ui);

        for event in state.drain_events() {
            match event {
                GameEvent::ShotFired { .. } => shots_fired += 1,
                GameEvent::AsteroidDestroyed { .. } => asteroids_destroyed += 1,
                GameEvent::GameOver {
                    score,
                    level,
                    new_high_score,
                } => {
                    games_played += 1;
                    log::info!(
                        "Game {games_played} over: score {score}, level {level}{}",
                        if new_high_score { " (new high score)" } else { "" }
                    );
                }
                other => log::debug!("{other:?}"),
            }
        }
    }

    let summary = RunSummary {
        seed: state.settings.seed,
        difficulty: state.settings.difficulty.as_str(),
        seconds: args.seconds,
        ticks: state.time_ticks,
        phase: state.phase(),
        level: state.level,
        lives: state.lives,
        score: state.score,
        games_played,
        shots_fired,
        asteroids_destroyed,
        high_scores: state.high_scores.entries.clone(),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize run summary: {e}"),
    }
}
