use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use blockfall_engine::{
    AutoRepeat, Command, EngineConfig, GameSession, ParseSeedError, PieceSeed,
};
use rand::{Rng, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use tracing::{debug, info};

use crate::util::{self, Output};

/// Commands the random driver presses, with relative weights.
const INPUT_WEIGHTS: [(Command, u32); 6] = [
    (Command::MoveLeft, 4),
    (Command::MoveRight, 4),
    (Command::SoftDrop, 2),
    (Command::RotateClockwise, 3),
    (Command::RotateCounterClockwise, 2),
    (Command::HardDrop, 1),
];

const PRESS_PROBABILITY: f64 = 0.25;
const RELEASE_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for the first game, as an integer or 32 hex digits [default: random]
    #[arg(long, value_parser = parse_seed)]
    seed: Option<PieceSeed>,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Frame limit per game
    #[arg(long, default_value_t = 100_000)]
    max_frames: usize,
    /// Simulated time per frame in milliseconds
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,
    /// Board configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path [default: stdout]
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Result of one simulated game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct GameSummary {
    seed: PieceSeed,
    score: usize,
    level: usize,
    lines: usize,
    pieces: usize,
    frames: usize,
    game_over: bool,
    board: Vec<String>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let config = match &arg.config {
        Some(path) => util::read_json_file::<EngineConfig, _>("engine config", path)?,
        None => EngineConfig::default(),
    };
    config.validate().context("Invalid engine configuration")?;

    let base_seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        %base_seed,
        games = arg.games,
        rows = config.rows,
        cols = config.cols,
        "starting simulation"
    );

    let summaries = simulate_games(
        config,
        base_seed,
        arg.games,
        arg.max_frames,
        Duration::from_millis(arg.frame_ms),
    )?;

    Output::save_json(&summaries, arg.output.clone())?;
    Ok(())
}

fn simulate_games(
    config: EngineConfig,
    base_seed: PieceSeed,
    games: usize,
    max_frames: usize,
    frame: Duration,
) -> anyhow::Result<Vec<GameSummary>> {
    let mut master = Pcg32::from_seed(base_seed.to_bytes());
    (0..games)
        .map(|game| -> anyhow::Result<GameSummary> {
            let seed = if game == 0 { base_seed } else { master.random() };
            let input = Pcg32::from_rng(&mut master);
            let session = GameSession::with_config(config, seed)?;
            let summary = play_game(session, seed, input, max_frames, frame);
            info!(
                game,
                %seed,
                score = summary.score,
                lines = summary.lines,
                frames = summary.frames,
                game_over = summary.game_over,
                "game finished"
            );
            Ok(summary)
        })
        .collect()
}

fn play_game(
    mut session: GameSession,
    seed: PieceSeed,
    mut input: Pcg32,
    max_frames: usize,
    frame: Duration,
) -> GameSummary {
    let mut repeat = AutoRepeat::default();
    let mut frames = 0;

    while frames < max_frames && !session.is_game_over() {
        for command in Command::ALL {
            if repeat.is_held(command) && input.random_bool(RELEASE_PROBABILITY) {
                repeat.release(command);
            }
        }
        if input.random_bool(PRESS_PROBABILITY) {
            let command = random_command(&mut input);
            debug!(frame = frames, ?command, "press");
            session.apply(repeat.press(command));
        }
        for command in repeat.update(frame) {
            session.apply(command);
        }
        session.tick(frame);
        frames += 1;
    }

    let snapshot = session.snapshot();
    GameSummary {
        seed,
        score: snapshot.stats.score(),
        level: snapshot.stats.level(),
        lines: snapshot.stats.lines_cleared(),
        pieces: snapshot.stats.completed_pieces(),
        frames,
        game_over: snapshot.is_game_over(),
        board: snapshot.board,
    }
}

fn random_command(rng: &mut Pcg32) -> Command {
    INPUT_WEIGHTS
        .choose_weighted(rng, |(_, weight)| *weight)
        .map_or(Command::HardDrop, |(command, _)| *command)
}

/// Accepts a decimal `u64` or the 32 hex digit seed text.
fn parse_seed(s: &str) -> Result<PieceSeed, ParseSeedError> {
    if let Ok(value) = s.parse::<u64>() {
        return Ok(PieceSeed::from(value));
    }
    s.parse()
}
