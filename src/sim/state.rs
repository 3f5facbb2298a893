//! Match state and phase machine
//!
//! Lives, potted history and the phase a match is in. Every transition is an
//! explicit method; calls that do not apply to the current phase are ignored
//! and report `false`.

use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every object ball potted with lives to spare
    Won,
    /// Ran out of lives
    Lost,
}

impl Outcome {
    pub fn headline(&self) -> &'static str {
        match self {
            Outcome::Won => "YOU WIN!",
            Outcome::Lost => "GAME OVER",
        }
    }
}

/// Phases a pause can interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interrupted {
    Aiming,
    PoweringUp,
    ShotInFlight,
}

impl Interrupted {
    pub fn phase(self) -> GamePhase {
        match self {
            Interrupted::Aiming => GamePhase::Aiming,
            Interrupted::PoweringUp => GamePhase::PoweringUp,
            Interrupted::ShotInFlight => GamePhase::ShotInFlight,
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a difficulty selection
    Menu,
    /// Balls at rest, cue follows the pointer
    Aiming,
    /// Button held, force oscillating
    PoweringUp,
    /// Balls moving after a shot
    ShotInFlight,
    /// Balls settled; shot is being finalised
    Resolving,
    /// Frozen; resumes into the interrupted phase
    Paused(Interrupted),
    /// Terminal
    GameOver(Outcome),
}

impl GamePhase {
    /// Whether the cue is live (aim follows the pointer)
    pub fn takes_aim(&self) -> bool {
        matches!(self, GamePhase::Aiming | GamePhase::PoweringUp)
    }

    fn interruptible(self) -> Option<Interrupted> {
        match self {
            GamePhase::Aiming => Some(Interrupted::Aiming),
            GamePhase::PoweringUp => Some(Interrupted::PoweringUp),
            GamePhase::ShotInFlight => Some(Interrupted::ShotInFlight),
            _ => None,
        }
    }
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    MatchStarted { difficulty: Difficulty, lives: u8 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    ShotTaken { number: u32, force: f32 },
    BallPotted { slot: u8 },
    CueBallPotted { lives_left: u8 },
    MatchOver(Outcome),
    Restarted,
}

/// Potting result handed over by the resolver for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PottingReport {
    /// Object-ball slots removed this tick, in capture order
    pub potted: Vec<u8>,
    pub cue_ball_potted: bool,
}

impl PottingReport {
    pub fn is_empty(&self) -> bool {
        self.potted.is_empty() && !self.cue_ball_potted
    }
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: GamePhase,
    pub difficulty: Option<Difficulty>,
    /// Lives remaining; zero is terminal
    pub lives: u8,
    /// Potted object-ball slots in capture order
    pub potted: Vec<u8>,
    /// Slots dropped during the shot in progress
    pub shot_potted: Vec<u8>,
    /// Cue ball went down during the shot in progress
    pub cue_ball_potted: bool,
    pub shots_taken: u32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Menu,
            difficulty: None,
            lives: 0,
            potted: Vec::new(),
            shot_potted: Vec::new(),
            cue_ball_potted: false,
            shots_taken: 0,
            events: Vec::new(),
        }
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::debug!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    fn ignored(&self, what: &str) -> bool {
        log::warn!("Ignoring {} in phase {:?}", what, self.phase);
        false
    }

    /// Menu -> Aiming with the lives for `difficulty`
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != GamePhase::Menu {
            return self.ignored("difficulty selection");
        }
        self.difficulty = Some(difficulty);
        self.lives = difficulty.lives();
        self.potted.clear();
        self.shot_potted.clear();
        self.cue_ball_potted = false;
        self.shots_taken = 0;
        log::info!(
            "Match started on {} with {} lives",
            difficulty.as_str(),
            self.lives
        );
        self.events.push(GameEvent::MatchStarted {
            difficulty,
            lives: self.lives,
        });
        self.set_phase(GamePhase::Aiming);
        true
    }

    /// Aiming -> PoweringUp
    pub fn begin_power(&mut self) -> bool {
        if self.phase != GamePhase::Aiming {
            return self.ignored("power start");
        }
        self.set_phase(GamePhase::PoweringUp);
        true
    }

    /// PoweringUp -> Aiming after a zero-force release
    pub fn cancel_power(&mut self) -> bool {
        if self.phase != GamePhase::PoweringUp {
            return self.ignored("power cancel");
        }
        self.set_phase(GamePhase::Aiming);
        true
    }

    /// PoweringUp -> ShotInFlight once the impulse is on the cue ball
    pub fn begin_shot(&mut self, force: f32) -> bool {
        if self.phase != GamePhase::PoweringUp {
            return self.ignored("shot");
        }
        self.shots_taken += 1;
        self.shot_potted.clear();
        self.cue_ball_potted = false;
        log::debug!("Shot {} taken with force {}", self.shots_taken, force);
        self.events.push(GameEvent::ShotTaken {
            number: self.shots_taken,
            force,
        });
        self.set_phase(GamePhase::ShotInFlight);
        true
    }

    /// Apply one tick's potting: cue scratch costs a life, pots are recorded
    pub fn record_potting(&mut self, report: &PottingReport) {
        if report.cue_ball_potted {
            self.lives = self.lives.saturating_sub(1);
            self.cue_ball_potted = true;
            log::info!("Cue ball potted, {} lives left", self.lives);
            self.events.push(GameEvent::CueBallPotted {
                lives_left: self.lives,
            });
        }
        for &slot in &report.potted {
            log::info!("Ball {} potted", slot + 1);
            self.potted.push(slot);
            self.shot_potted.push(slot);
            self.events.push(GameEvent::BallPotted { slot });
        }
    }

    /// ShotInFlight -> Resolving once every ball is at rest
    pub fn settle(&mut self) -> bool {
        if self.phase != GamePhase::ShotInFlight {
            return self.ignored("settle");
        }
        self.set_phase(GamePhase::Resolving);
        true
    }

    /// Resolving -> Aiming or GameOver.
    ///
    /// Running out of lives is a loss even if the table was cleared on the
    /// same shot.
    pub fn finish_shot(&mut self, object_balls_left: usize) -> GamePhase {
        if self.phase != GamePhase::Resolving {
            self.ignored("shot resolution");
            return self.phase;
        }
        let outcome = if self.lives == 0 {
            Some(Outcome::Lost)
        } else if object_balls_left == 0 {
            Some(Outcome::Won)
        } else {
            None
        };
        match outcome {
            Some(outcome) => {
                log::info!(
                    "{} ({} potted, {} shots)",
                    outcome.headline(),
                    self.potted.len(),
                    self.shots_taken
                );
                self.events.push(GameEvent::MatchOver(outcome));
                self.set_phase(GamePhase::GameOver(outcome));
            }
            None => self.set_phase(GamePhase::Aiming),
        }
        self.phase
    }

    pub fn pause(&mut self) -> bool {
        let Some(interrupted) = self.phase.interruptible() else {
            return self.ignored("pause");
        };
        self.set_phase(GamePhase::Paused(interrupted));
        true
    }

    pub fn resume(&mut self) -> bool {
        let GamePhase::Paused(interrupted) = self.phase else {
            return self.ignored("resume");
        };
        self.set_phase(interrupted.phase());
        true
    }

    /// Back to the menu with a clean slate
    pub fn reset(&mut self) {
        let events = std::mem::take(&mut self.events);
        let from = self.phase;
        *self = Self::new();
        self.events = events;
        self.events.push(GameEvent::Restarted);
        if from != GamePhase::Menu {
            self.events.push(GameEvent::PhaseChanged {
                from,
                to: GamePhase::Menu,
            });
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_flight(difficulty: Difficulty) -> MatchState {
        let mut state = MatchState::new();
        assert!(state.select_difficulty(difficulty));
        assert!(state.begin_power());
        assert!(state.begin_shot(5000.0));
        state
    }

    #[test]
    fn difficulty_sets_lives() {
        for difficulty in Difficulty::ALL {
            let mut state = MatchState::new();
            assert!(state.select_difficulty(difficulty));
            assert_eq!(state.lives, difficulty.lives());
            assert_eq!(state.phase, GamePhase::Aiming);
        }
    }

    #[test]
    fn difficulty_only_from_menu() {
        let mut state = MatchState::new();
        state.select_difficulty(Difficulty::Easy);
        assert!(!state.select_difficulty(Difficulty::Hardcore));
        assert_eq!(state.lives, 5);
    }

    #[test]
    fn invalid_transitions_are_ignored() {
        let mut state = MatchState::new();
        assert!(!state.begin_power());
        assert!(!state.begin_shot(100.0));
        assert!(!state.pause());
        assert!(!state.resume());
        assert!(!state.settle());
        assert_eq!(state.finish_shot(15), GamePhase::Menu);
        assert_eq!(state.phase, GamePhase::Menu);

        state.select_difficulty(Difficulty::Normal);
        assert!(!state.begin_shot(100.0));
        assert!(!state.cancel_power());
        assert_eq!(state.phase, GamePhase::Aiming);
    }

    #[test]
    fn full_shot_cycle_back_to_aiming() {
        let mut state = in_flight(Difficulty::Normal);
        state.record_potting(&PottingReport {
            potted: vec![4, 9],
            cue_ball_potted: false,
        });
        assert!(state.settle());
        assert_eq!(state.finish_shot(13), GamePhase::Aiming);
        assert_eq!(state.potted, vec![4, 9]);
        assert_eq!(state.shots_taken, 1);
    }

    #[test]
    fn hardcore_scratch_is_a_loss() {
        let mut state = in_flight(Difficulty::Hardcore);
        state.record_potting(&PottingReport {
            potted: vec![],
            cue_ball_potted: true,
        });
        assert_eq!(state.lives, 0);
        state.settle();
        assert_eq!(state.finish_shot(15), GamePhase::GameOver(Outcome::Lost));
        assert_eq!(state.outcome(), Some(Outcome::Lost));
    }

    #[test]
    fn clearing_the_table_is_a_win() {
        let mut state = in_flight(Difficulty::Easy);
        state.record_potting(&PottingReport {
            potted: (0..15).collect(),
            cue_ball_potted: false,
        });
        state.settle();
        assert_eq!(state.finish_shot(0), GamePhase::GameOver(Outcome::Won));
        assert_eq!(Outcome::Won.headline(), "YOU WIN!");
    }

    #[test]
    fn last_life_lost_while_clearing_is_a_loss() {
        let mut state = in_flight(Difficulty::Hardcore);
        state.record_potting(&PottingReport {
            potted: vec![0],
            cue_ball_potted: true,
        });
        state.settle();
        assert_eq!(state.finish_shot(0), GamePhase::GameOver(Outcome::Lost));
    }

    #[test]
    fn lives_never_go_negative() {
        let mut state = in_flight(Difficulty::Hardcore);
        let scratch = PottingReport {
            potted: vec![],
            cue_ball_potted: true,
        };
        state.record_potting(&scratch);
        state.record_potting(&scratch);
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn pause_returns_to_interrupted_phase() {
        let mut state = MatchState::new();
        state.select_difficulty(Difficulty::Normal);
        for phase in [GamePhase::Aiming, GamePhase::PoweringUp, GamePhase::ShotInFlight] {
            state.phase = phase;
            assert!(state.pause());
            assert!(matches!(state.phase, GamePhase::Paused(_)));
            assert!(!state.pause());
            assert!(state.resume());
            assert_eq!(state.phase, phase);
        }
        state.phase = GamePhase::Resolving;
        assert!(!state.pause());
    }

    #[test]
    fn events_are_drained_in_order() {
        let mut state = in_flight(Difficulty::Normal);
        let events = state.drain_events();
        assert_eq!(
            events.first(),
            Some(&GameEvent::MatchStarted {
                difficulty: Difficulty::Normal,
                lives: 3
            })
        );
        assert!(events.contains(&GameEvent::ShotTaken {
            number: 1,
            force: 5000.0
        }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::PhaseChanged {
                from: GamePhase::PoweringUp,
                to: GamePhase::ShotInFlight
            })
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn reset_returns_to_menu() {
        let mut state = in_flight(Difficulty::Easy);
        state.record_potting(&PottingReport {
            potted: vec![1],
            cue_ball_potted: true,
        });
        state.reset();
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.potted.is_empty());
        assert_eq!(state.lives, 0);
        assert_eq!(state.shots_taken, 0);
        assert!(state.drain_events().contains(&GameEvent::Restarted));
    }
}
