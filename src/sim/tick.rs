//! Fixed timestep simulation tick
//!
//! Binds the table, the rack, the cue and the match state to a physics
//! engine and advances them one fixed step at a time.

use std::fmt;

use glam::Vec2;

use super::potting::PottingResolver;
use super::registry::BallRegistry;
use super::shot::ShotController;
use super::snapshot::FrameSnapshot;
use super::state::{GameEvent, GamePhase, MatchState};
use super::table::TableLayout;
use crate::physics::{BodyHandle, PhysicsEngine, PhysicsError};
use crate::settings::{Difficulty, Settings};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in table coordinates
    pub pointer: Option<Vec2>,
    /// Button went down: start charging
    pub power_down: bool,
    /// Button came up: fire (edge-triggered)
    pub release: bool,
    /// Menu choice
    pub select_difficulty: Option<Difficulty>,
    pub pause: bool,
    pub resume: bool,
    /// Re-rack and return to the menu (from game over or pause)
    pub restart: bool,
}

/// Setup failures. None of these are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    Physics(PhysicsError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Physics(err) => write!(f, "physics engine error: {err}"),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::Physics(err) => Some(err),
        }
    }
}

impl From<PhysicsError> for MatchError {
    fn from(err: PhysicsError) -> Self {
        MatchError::Physics(err)
    }
}

/// A single-table match driven one tick at a time
pub struct Match<E: PhysicsEngine> {
    engine: E,
    settings: Settings,
    layout: TableLayout,
    cushions: Vec<BodyHandle>,
    registry: BallRegistry,
    shot: ShotController,
    resolver: PottingResolver,
    state: MatchState,
    time_ticks: u64,
}

impl<E: PhysicsEngine> Match<E> {
    /// Set up the standard table on `engine`, waiting in the menu
    pub fn new(engine: E, settings: Settings) -> Result<Self, MatchError> {
        let layout = TableLayout::with_pocket_radius(settings.pocket_radius);
        Self::with_layout(engine, settings, layout)
    }

    pub fn with_layout(
        mut engine: E,
        settings: Settings,
        layout: TableLayout,
    ) -> Result<Self, MatchError> {
        let cushions = layout.register_cushions(&mut engine, settings.cushion_elasticity)?;
        let mut registry = BallRegistry::new();
        registry.create_rack(&layout, &mut engine, &settings)?;
        log::info!(
            "Table ready: {} cushions, {} pockets, {} balls",
            cushions.len(),
            layout.pockets.len(),
            registry.len()
        );

        Ok(Self {
            shot: ShotController::new(settings.max_force, settings.force_step),
            resolver: PottingResolver::new(&layout),
            state: MatchState::new(),
            engine,
            settings,
            layout,
            cushions,
            registry,
            time_ticks: 0,
        })
    }

    /// Advance the match by one fixed timestep
    pub fn tick(&mut self, input: &TickInput) -> Result<(), MatchError> {
        if input.restart {
            if matches!(self.state.phase, GamePhase::GameOver(_) | GamePhase::Paused(_)) {
                return self.restart();
            }
            log::warn!("Ignoring restart in phase {:?}", self.state.phase);
        }

        // Pausing freezes everything, including this tick
        if input.pause && self.state.pause() {
            return Ok(());
        }
        if input.resume {
            self.state.resume();
        }

        match self.state.phase {
            GamePhase::Menu => {
                if let Some(difficulty) = input.select_difficulty {
                    self.state.select_difficulty(difficulty);
                }
                return Ok(());
            }
            GamePhase::Paused(_) | GamePhase::GameOver(_) => return Ok(()),
            GamePhase::Aiming => {
                self.aim(input);
                if input.power_down {
                    self.state.begin_power();
                    // Click within one tick: press then release
                    if input.release {
                        self.fire()?;
                    }
                } else if input.release {
                    log::debug!("Release without charge ignored");
                }
            }
            GamePhase::PoweringUp => {
                self.aim(input);
                if input.release {
                    self.fire()?;
                } else {
                    self.shot.accumulate_power();
                }
            }
            GamePhase::ShotInFlight | GamePhase::Resolving => {}
        }

        self.step()
    }

    /// Step the engine once, then pot, then check for rest
    fn step(&mut self) -> Result<(), MatchError> {
        self.time_ticks += 1;
        self.engine.step(self.settings.dt);
        self.registry.sync(&self.engine);

        match self.state.phase {
            GamePhase::ShotInFlight => {
                self.resolver
                    .resolve(&mut self.registry, &mut self.engine, &mut self.state)?;
                if self.registry.all_settled(self.settings.settle_epsilon) {
                    self.state.settle();
                }
            }
            GamePhase::Resolving => {
                self.resolver
                    .resolve(&mut self.registry, &mut self.engine, &mut self.state)?;
                self.state.finish_shot(self.registry.object_ball_count());
            }
            _ => {}
        }
        Ok(())
    }

    fn aim(&mut self, input: &TickInput) {
        let (Some(pointer), Some(cue)) = (input.pointer, self.registry.cue_ball()) else {
            return;
        };
        self.shot.update_aim(cue.pos, pointer);
    }

    fn fire(&mut self) -> Result<(), MatchError> {
        let force = self.shot.force();
        let Some(impulse) = self.shot.release() else {
            log::debug!("Zero-force release, no shot");
            self.state.cancel_power();
            return Ok(());
        };
        let Some(body) = self.registry.cue_ball().and_then(|b| b.body) else {
            log::warn!("No cue ball to strike");
            self.state.cancel_power();
            return Ok(());
        };

        self.engine
            .apply_impulse_at_local_point(body, impulse, Vec2::ZERO)?;
        log::debug!(
            "Cue struck: force {} at {:.1} deg, impulse {:?}",
            force,
            self.shot.angle_degrees(),
            impulse
        );
        self.state.begin_shot(force);
        Ok(())
    }

    /// Tear down the rack, build a fresh one and go back to the menu
    pub fn restart(&mut self) -> Result<(), MatchError> {
        self.registry
            .create_rack(&self.layout, &mut self.engine, &self.settings)?;
        self.shot = ShotController::new(self.settings.max_force, self.settings.force_step);
        self.state.reset();
        self.time_ticks = 0;
        log::info!("Match restarted");
        Ok(())
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self.time_ticks, &self.state, &self.registry, &self.shot)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn registry(&self) -> &BallRegistry {
        &self.registry
    }

    pub fn shot(&self) -> &ShotController {
        &self.shot
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cushions(&self) -> &[BodyHandle] {
        &self.cushions
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Ball state is re-read from the engine on the next tick
    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }
}
