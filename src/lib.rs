//! Pocket Pool - single-table billiards simulation core
//!
//! Core modules:
//! - `sim`: Fixed-timestep match simulation (rack, cue, potting, match state)
//! - `physics`: Rigid-body engine seam and the Rapier2D-backed engine
//! - `platform`: Native frame pacing
//! - `settings`: Difficulty selection and tuning values
//! - `autoplay`: Seeded computer player for headless runs

pub mod autoplay;
pub mod physics;
pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz, one physics step per tick)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    pub const TICK_RATE_HZ: u32 = 120;
    /// Cap on ticks run for one frame, and on the frame time fed in
    pub const MAX_SUBSTEPS: u32 = 8;
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Table dimensions (playfield, excluding the score panel)
    pub const TABLE_WIDTH: f32 = 1200.0;
    pub const TABLE_HEIGHT: f32 = 678.0;

    /// Ball defaults
    pub const BALL_DIAMETER: f32 = 36.0;
    pub const BALL_RADIUS: f32 = BALL_DIAMETER / 2.0;
    pub const BALL_MASS: f32 = 5.0;
    /// Restitution for balls and cushions
    pub const ELASTICITY: f32 = 0.8;
    /// Max restoring force of the planar pivot holding each ball to the cloth
    pub const PIVOT_MAX_FORCE: f32 = 1000.0;

    /// Pocket defaults
    pub const POCKET_DIAMETER: f32 = 66.0;
    /// Capture radius: a ball centre this close to a pocket centre drops
    pub const POCKET_RADIUS: f32 = POCKET_DIAMETER / 2.0;

    /// Cue power
    pub const MAX_FORCE: f32 = 10_000.0;
    pub const FORCE_STEP: f32 = 100.0;
    /// Force per power-bar segment in the HUD
    pub const POWER_BAR_SEGMENT: f32 = 2000.0;

    /// Velocity components below this count as settled
    pub const SETTLE_EPSILON: f32 = 1.0;

    /// Rack slots: 15 object balls plus the cue ball
    pub const RACK_SLOTS: usize = 16;
    pub const OBJECT_BALLS: usize = 15;
    /// Slot reserved for the cue ball (always created last)
    pub const CUE_SLOT: u8 = 15;

    /// Top-left ball of the rack triangle
    pub const RACK_ORIGIN: Vec2 = Vec2::new(250.0, 267.0);
    /// Cue ball start and respawn point
    pub const CUE_SPAWN: Vec2 = Vec2::new(888.0, TABLE_HEIGHT / 2.0);
}

/// Aim angle (radians) from `cue` toward `pointer`, Y inverted for screen space.
#[inline]
pub fn aim_angle(cue: Vec2, pointer: Vec2) -> f32 {
    let x_dist = cue.x - pointer.x;
    let y_dist = -(cue.y - pointer.y);
    y_dist.atan2(x_dist)
}

/// Unit impulse direction for a cue angle
#[inline]
pub fn shot_direction(angle: f32) -> Vec2 {
    Vec2::new(-angle.cos(), angle.sin())
}
