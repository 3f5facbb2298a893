//! Read-only per-frame view for the renderer/HUD

use glam::Vec2;
use serde::Serialize;

use super::registry::BallRegistry;
use super::shot::ShotController;
use super::state::{GamePhase, MatchState, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallSprite {
    /// Visual index (0-14 object balls, 15 cue ball)
    pub slot: u8,
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CueSprite {
    /// Cue ball centre the cue is drawn around
    pub pos: Vec2,
    pub angle_degrees: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerGauge {
    pub force: f32,
    pub fraction: f32,
    /// Lit bar segments (0-5)
    pub bars: u32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub lives: u8,
    pub balls: Vec<BallSprite>,
    /// Only while the player can aim
    pub cue: Option<CueSprite>,
    /// Only while powering up
    pub power: Option<PowerGauge>,
    pub potted: Vec<u8>,
    pub outcome: Option<Outcome>,
}

impl FrameSnapshot {
    pub fn capture(
        tick: u64,
        state: &MatchState,
        registry: &BallRegistry,
        shot: &ShotController,
    ) -> Self {
        let cue = if state.phase.takes_aim() {
            registry.cue_ball().map(|b| CueSprite {
                pos: b.pos,
                angle_degrees: shot.angle_degrees(),
            })
        } else {
            None
        };
        let power = (state.phase == GamePhase::PoweringUp).then(|| PowerGauge {
            force: shot.force(),
            fraction: shot.power_fraction(),
            bars: shot.power_bars(),
        });

        Self {
            tick,
            phase: state.phase,
            lives: state.lives,
            balls: registry
                .iter()
                .map(|b| BallSprite {
                    slot: b.slot,
                    pos: b.pos,
                    radius: b.radius,
                })
                .collect(),
            cue,
            power,
            potted: state.potted.clone(),
            outcome: state.outcome(),
        }
    }

    /// One-line JSON for headless logging
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
