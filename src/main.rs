//! Pocket Pool headless driver
//!
//! Runs one match on the Rapier-backed engine with the seeded autoplayer at
//! the input seat and logs what happens.
//!
//! Usage: `pocket-pool [easy|normal|hardcore|1|2|3] [seed] [--unthrottled]`

use std::process::ExitCode;

use pocket_pool::autoplay::AutoPlayer;
use pocket_pool::consts::*;
use pocket_pool::physics::RapierEngine;
use pocket_pool::platform::{FrameClock, FramePacer};
use pocket_pool::sim::{GameEvent, Match};
use pocket_pool::{Difficulty, Settings};

/// Give up after this many shots
const SHOT_LIMIT: u32 = 200;
/// Safety net for a shot that never settles (ten simulated minutes)
const TICK_LIMIT: u64 = TICK_RATE_HZ as u64 * 600;

struct Args {
    difficulty: Difficulty,
    seed: u64,
    unthrottled: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        difficulty: Difficulty::default(),
        seed: 0x5eed,
        unthrottled: false,
    };
    let mut positional = 0;
    for arg in std::env::args().skip(1) {
        if arg == "--unthrottled" {
            args.unthrottled = true;
            continue;
        }
        match positional {
            0 => {
                args.difficulty = Difficulty::from_str(&arg)
                    .ok_or_else(|| format!("unknown difficulty '{arg}'"))?;
            }
            1 => {
                args.seed = arg
                    .parse()
                    .map_err(|_| format!("seed must be an integer, got '{arg}'"))?;
            }
            _ => return Err(format!("unexpected argument '{arg}'")),
        }
        positional += 1;
    }
    Ok(args)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::MatchStarted { difficulty, lives } => {
            log::info!("New match: {} ({} lives)", difficulty.as_str(), lives)
        }
        GameEvent::ShotTaken { number, force } => log::info!("Shot {number}: force {force}"),
        GameEvent::BallPotted { slot } => log::info!("Potted ball {}", slot + 1),
        GameEvent::CueBallPotted { lives_left } => {
            log::info!("Scratch! {lives_left} lives left")
        }
        GameEvent::MatchOver(outcome) => log::info!("{}", outcome.headline()),
        GameEvent::PhaseChanged { from, to } => log::trace!("{from:?} -> {to:?}"),
        GameEvent::Restarted => log::info!("Restarted"),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            log::error!("{err}");
            eprintln!("usage: pocket-pool [easy|normal|hardcore|1|2|3] [seed] [--unthrottled]");
            return ExitCode::from(2);
        }
    };
    log::info!(
        "Pocket Pool starting: {} difficulty, seed {}",
        args.difficulty.as_str(),
        args.seed
    );

    let settings = Settings::default();
    log::debug!("Settings: {}", settings.to_json());
    let mut game = match Match::new(RapierEngine::new(), settings) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Table setup failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut player = AutoPlayer::new(args.seed, args.difficulty);
    let mut pacer = FramePacer::from_step(game.settings().dt);
    let mut clock = FrameClock::new(pacer.period().as_secs_f32());

    while !game.is_over() && game.state().shots_taken < SHOT_LIMIT && game.ticks() < TICK_LIMIT {
        let ticks = if args.unthrottled {
            1
        } else {
            clock.advance(pacer.wait().as_secs_f32())
        };
        for _ in 0..ticks {
            let input = player.next_input(&game.snapshot());
            if let Err(err) = game.tick(&input) {
                log::error!("Simulation failed: {err}");
                return ExitCode::FAILURE;
            }
        }
        for event in game.drain_events() {
            log_event(&event);
        }
    }

    let snapshot = game.snapshot();
    match snapshot.outcome {
        Some(outcome) => log::info!(
            "Finished: {} after {} shots",
            outcome.headline(),
            game.state().shots_taken
        ),
        None => log::warn!("Stopped without a result after {} shots", game.state().shots_taken),
    }
    log::info!("Final frame: {}", snapshot.to_json());
    ExitCode::SUCCESS
}
