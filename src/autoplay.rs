//! Seeded computer player for the headless driver
//!
//! Reads only the per-frame snapshot and produces the same [`TickInput`]s a
//! human would: aim at the nearest object ball, hold, release at a random
//! target power.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::Difficulty;
use crate::sim::{FrameSnapshot, GamePhase, TickInput};

/// Pointer jitter around the target ball, in table units
const AIM_JITTER: f32 = 6.0;
const MIN_FORCE: f32 = 2_000.0;
const MAX_AUTO_FORCE: f32 = 9_000.0;

#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: Pcg32,
    difficulty: Difficulty,
    pointer: Option<Vec2>,
    target_force: f32,
}

impl AutoPlayer {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            pointer: None,
            target_force: MIN_FORCE,
        }
    }

    pub fn target_force(&self) -> f32 {
        self.target_force
    }

    /// Decide this tick's input from the last frame
    pub fn next_input(&mut self, frame: &FrameSnapshot) -> TickInput {
        match frame.phase {
            GamePhase::Menu => TickInput {
                select_difficulty: Some(self.difficulty),
                ..Default::default()
            },
            GamePhase::Aiming => {
                let Some(pointer) = self.pick_target(frame) else {
                    return TickInput::default();
                };
                self.pointer = Some(pointer);
                let steps = (self.rng.random_range(MIN_FORCE..=MAX_AUTO_FORCE) / FORCE_STEP).round();
                self.target_force = steps * FORCE_STEP;
                log::debug!(
                    "Autoplayer aiming at ({:.0}, {:.0}) for force {}",
                    pointer.x,
                    pointer.y,
                    self.target_force
                );
                TickInput {
                    pointer: Some(pointer),
                    power_down: true,
                    ..Default::default()
                }
            }
            GamePhase::PoweringUp => {
                let force = frame.power.map(|p| p.force).unwrap_or(0.0);
                TickInput {
                    pointer: self.pointer,
                    release: force >= self.target_force,
                    ..Default::default()
                }
            }
            _ => TickInput::default(),
        }
    }

    /// Nearest object ball to the cue ball, jittered
    fn pick_target(&mut self, frame: &FrameSnapshot) -> Option<Vec2> {
        let cue = frame.balls.iter().find(|b| b.slot == CUE_SLOT)?.pos;
        let target = frame
            .balls
            .iter()
            .filter(|b| b.slot != CUE_SLOT)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(cue)
                    .total_cmp(&b.pos.distance_squared(cue))
            })?
            .pos;
        let jitter = Vec2::new(
            self.rng.random_range(-AIM_JITTER..=AIM_JITTER),
            self.rng.random_range(-AIM_JITTER..=AIM_JITTER),
        );
        Some(target + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::scripted::ScriptedEngine;
    use crate::settings::Settings;
    use crate::sim::Match;

    fn play(seed: u64, ticks: usize) -> (Match<ScriptedEngine>, Vec<TickInput>) {
        let mut game = Match::new(ScriptedEngine::new(), Settings::default()).unwrap();
        let mut player = AutoPlayer::new(seed, Difficulty::Easy);
        let mut inputs = Vec::new();
        for _ in 0..ticks {
            let input = player.next_input(&game.snapshot());
            game.tick(&input).unwrap();
            inputs.push(input);
        }
        (game, inputs)
    }

    #[test]
    fn selects_difficulty_from_menu() {
        let game = Match::new(ScriptedEngine::new(), Settings::default()).unwrap();
        let mut player = AutoPlayer::new(1, Difficulty::Hardcore);
        let input = player.next_input(&game.snapshot());
        assert_eq!(input.select_difficulty, Some(Difficulty::Hardcore));
    }

    #[test]
    fn aims_at_nearest_object_ball() {
        let mut game = Match::new(ScriptedEngine::new(), Settings::default()).unwrap();
        let mut player = AutoPlayer::new(7, Difficulty::Normal);
        game.tick(&player.next_input(&game.snapshot())).unwrap();

        let frame = game.snapshot();
        let input = player.next_input(&frame);
        assert!(input.power_down);
        let pointer = input.pointer.unwrap();
        // Rightmost rack column is nearest the cue spawn
        let nearest_x = frame
            .balls
            .iter()
            .filter(|b| b.slot != CUE_SLOT)
            .map(|b| b.pos.x)
            .fold(f32::MIN, f32::max);
        assert!((pointer.x - nearest_x).abs() <= AIM_JITTER);
        assert!((MIN_FORCE..=MAX_AUTO_FORCE).contains(&player.target_force()));
        assert_eq!(player.target_force() % FORCE_STEP, 0.0);
    }

    #[test]
    fn takes_a_shot() {
        let (game, _) = play(42, 200);
        assert_eq!(game.state().shots_taken, 1);
        assert_eq!(game.engine().impulses.len(), 1);
    }

    #[test]
    fn same_seed_same_game() {
        let (a, inputs_a) = play(99, 400);
        let (b, inputs_b) = play(99, 400);
        assert_eq!(a.snapshot(), b.snapshot());
        let pointers = |inputs: &[TickInput]| inputs.iter().map(|i| i.pointer).collect::<Vec<_>>();
        assert_eq!(pointers(&inputs_a), pointers(&inputs_b));
    }
}
