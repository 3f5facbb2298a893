//! Cue aim and power
//!
//! Power oscillates between 0 and the maximum while the button is held and is
//! converted into a single impulse on release.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{aim_angle, shot_direction};

/// Power-up direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerDirection {
    Rising,
    Falling,
}

impl PowerDirection {
    pub fn sign(self) -> f32 {
        match self {
            PowerDirection::Rising => 1.0,
            PowerDirection::Falling => -1.0,
        }
    }

    fn flipped(self) -> Self {
        match self {
            PowerDirection::Rising => PowerDirection::Falling,
            PowerDirection::Falling => PowerDirection::Rising,
        }
    }
}

/// Current aim and accumulated force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotController {
    /// Cue angle in radians (see [`aim_angle`])
    angle: f32,
    force: f32,
    direction: PowerDirection,
    max_force: f32,
    force_step: f32,
}

impl Default for ShotController {
    fn default() -> Self {
        Self::new(MAX_FORCE, FORCE_STEP)
    }
}

impl ShotController {
    pub fn new(max_force: f32, force_step: f32) -> Self {
        Self {
            angle: 0.0,
            force: 0.0,
            direction: PowerDirection::Rising,
            max_force,
            force_step,
        }
    }

    /// Point the cue from the cue ball toward the pointer
    pub fn update_aim(&mut self, cue_ball: Vec2, pointer: Vec2) -> f32 {
        self.angle = aim_angle(cue_ball, pointer);
        self.angle
    }

    /// One tick of power build-up. Direction flips on touching either bound.
    pub fn accumulate_power(&mut self) -> f32 {
        self.force += self.force_step * self.direction.sign();
        self.force = self.force.clamp(0.0, self.max_force);
        if self.force >= self.max_force || self.force <= 0.0 {
            self.direction = self.direction.flipped();
        }
        self.force
    }

    /// Turn the stored force into an impulse and reset power.
    ///
    /// Returns `None` for a zero-force release; the release is still consumed.
    pub fn release(&mut self) -> Option<Vec2> {
        let force = self.force;
        self.reset_power();
        if force <= 0.0 {
            return None;
        }
        Some(shot_direction(self.angle) * force)
    }

    pub fn reset_power(&mut self) {
        self.force = 0.0;
        self.direction = PowerDirection::Rising;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Cue angle in degrees for sprite rotation
    pub fn angle_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }

    pub fn force(&self) -> f32 {
        self.force
    }

    pub fn direction(&self) -> PowerDirection {
        self.direction
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    /// Force as a 0..=1 fraction
    pub fn power_fraction(&self) -> f32 {
        if self.max_force > 0.0 {
            self.force / self.max_force
        } else {
            0.0
        }
    }

    /// Number of lit power-bar segments
    pub fn power_bars(&self) -> u32 {
        (self.force / POWER_BAR_SEGMENT).ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reaches_max_after_hundred_ticks_then_falls() {
        let mut shot = ShotController::default();
        for tick in 1..=100 {
            let force = shot.accumulate_power();
            assert_eq!(force, tick as f32 * 100.0);
            if tick < 100 {
                assert_eq!(shot.direction(), PowerDirection::Rising);
            }
        }
        assert_eq!(shot.force(), 10_000.0);
        assert_eq!(shot.direction(), PowerDirection::Falling);

        assert_eq!(shot.accumulate_power(), 9_900.0);
    }

    #[test]
    fn full_cycle_returns_to_zero_and_rises_again() {
        let mut shot = ShotController::default();
        for _ in 0..200 {
            shot.accumulate_power();
        }
        assert_eq!(shot.force(), 0.0);
        assert_eq!(shot.direction(), PowerDirection::Rising);
        assert_eq!(shot.accumulate_power(), 100.0);
    }

    #[test]
    fn zero_force_release_is_a_no_op() {
        let mut shot = ShotController::default();
        shot.update_aim(Vec2::new(500.0, 300.0), Vec2::new(100.0, 300.0));
        assert_eq!(shot.release(), None);
        assert_eq!(shot.force(), 0.0);
    }

    #[test]
    fn release_fires_toward_pointer_and_resets() {
        let mut shot = ShotController::default();
        shot.update_aim(Vec2::new(500.0, 300.0), Vec2::new(100.0, 300.0));
        for _ in 0..30 {
            shot.accumulate_power();
        }
        let impulse = shot.release().unwrap();
        assert!((impulse.x + 3000.0).abs() < 1e-3);
        assert!(impulse.y.abs() < 1e-3);
        assert_eq!(shot.force(), 0.0);
        assert_eq!(shot.direction(), PowerDirection::Rising);
    }

    #[test]
    fn release_keeps_falling_force() {
        let mut shot = ShotController::default();
        for _ in 0..150 {
            shot.accumulate_power();
        }
        assert_eq!(shot.force(), 5_000.0);
        let impulse = shot.release().unwrap();
        assert!((impulse.length() - 5_000.0).abs() < 0.5);
    }

    #[test]
    fn power_bars_follow_force() {
        let mut shot = ShotController::default();
        assert_eq!(shot.power_bars(), 0);
        shot.accumulate_power();
        assert_eq!(shot.power_bars(), 1);
        for _ in 0..99 {
            shot.accumulate_power();
        }
        assert_eq!(shot.power_bars(), 5);
        assert_eq!(shot.power_fraction(), 1.0);
    }

    #[test]
    fn angle_degrees_for_renderer() {
        let mut shot = ShotController::default();
        shot.update_aim(Vec2::new(500.0, 300.0), Vec2::new(500.0, 600.0));
        assert!((shot.angle_degrees() - 90.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn force_stays_in_bounds_and_flips_only_at_bounds(ticks in 0usize..1_000) {
            let mut shot = ShotController::default();
            let mut prev_dir = shot.direction();
            for _ in 0..ticks {
                let force = shot.accumulate_power();
                prop_assert!((0.0..=MAX_FORCE).contains(&force));
                if shot.direction() != prev_dir {
                    prop_assert!(force == 0.0 || force == MAX_FORCE);
                }
                prev_dir = shot.direction();
            }
        }

        #[test]
        fn impulse_magnitude_equals_force(
            px in 0.0f32..1200.0,
            py in 0.0f32..678.0,
            ticks in 1usize..100,
        ) {
            let cue = Vec2::new(600.0, 339.0);
            prop_assume!(cue.distance(Vec2::new(px, py)) > 1.0);
            let mut shot = ShotController::default();
            shot.update_aim(cue, Vec2::new(px, py));
            for _ in 0..ticks {
                shot.accumulate_power();
            }
            let force = shot.force();
            let impulse = shot.release().unwrap();
            prop_assert!((impulse.length() - force).abs() < force * 1e-4 + 1e-3);
        }
    }
}
