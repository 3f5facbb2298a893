//! Live ball set
//!
//! The registry owns every ball on the table. Balls are addressed by a
//! [`BallId`] that is never reused, so a held id can go stale but can never
//! silently point at a different ball after a removal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::table::TableLayout;
use crate::consts::CUE_SLOT;
use crate::physics::{BodyHandle, CircleDesc, PhysicsEngine, PhysicsError, PlanarPivot};
use crate::settings::Settings;

/// Stable ball identifier (creation order, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    /// Rack slot / visual index (0-14 object balls, 15 cue ball)
    pub slot: u8,
    #[serde(skip)]
    pub body: Option<BodyHandle>,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub elasticity: f32,
}

impl Ball {
    pub fn is_cue(&self) -> bool {
        self.slot == CUE_SLOT
    }

    /// Both velocity components below `epsilon`
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.vel.x.abs() < epsilon && self.vel.y.abs() < epsilon
    }
}

/// Owns the live balls in creation order
#[derive(Debug, Clone, Default)]
pub struct BallRegistry {
    balls: Vec<Ball>,
    next_id: u32,
}

impl BallRegistry {
    pub fn new() -> Self {
        Self {
            balls: Vec::with_capacity(crate::consts::RACK_SLOTS),
            next_id: 1,
        }
    }

    fn next_ball_id(&mut self) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn<E: PhysicsEngine>(
        &mut self,
        engine: &mut E,
        settings: &Settings,
        slot: u8,
        pos: Vec2,
    ) -> Result<Ball, PhysicsError> {
        let body = engine.add_circle(&CircleDesc {
            position: pos,
            radius: settings.ball_radius,
            mass: settings.ball_mass,
            elasticity: settings.ball_elasticity,
            pivot: Some(PlanarPivot {
                max_force: settings.pivot_max_force,
            }),
        })?;
        let ball = Ball {
            id: self.next_ball_id(),
            slot,
            body: Some(body),
            pos,
            vel: Vec2::ZERO,
            radius: settings.ball_radius,
            mass: settings.ball_mass,
            elasticity: settings.ball_elasticity,
        };
        self.balls.push(ball);
        Ok(ball)
    }

    /// Rack the 15 object balls, then the cue ball (always created last).
    ///
    /// Any previous rack is torn down first. On failure every body created so
    /// far is removed again and the registry is left empty.
    pub fn create_rack<E: PhysicsEngine>(
        &mut self,
        layout: &TableLayout,
        engine: &mut E,
        settings: &Settings,
    ) -> Result<Vec<Ball>, PhysicsError> {
        self.clear(engine)?;

        let positions = layout.rack_positions(settings.ball_diameter());
        let spawned = positions
            .into_iter()
            .enumerate()
            .map(|(slot, pos)| (slot as u8, pos))
            .chain(std::iter::once((CUE_SLOT, layout.cue_spawn)))
            .try_for_each(|(slot, pos)| self.spawn(engine, settings, slot, pos).map(|_| ()));

        if let Err(err) = spawned {
            // Rollback is best effort; the first error is the one returned
            let _ = self.clear(engine);
            return Err(err);
        }

        log::debug!("Racked {} balls", self.balls.len());
        Ok(self.balls.clone())
    }

    /// The cue ball, if a rack exists
    pub fn cue_ball(&self) -> Option<&Ball> {
        self.balls.last().filter(|b| b.is_cue())
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    /// Remove an object ball from the registry and the engine.
    ///
    /// The cue ball is never removed; asking for it returns `Ok(None)`.
    pub fn remove<E: PhysicsEngine>(
        &mut self,
        id: BallId,
        engine: &mut E,
    ) -> Result<Option<Ball>, PhysicsError> {
        let Some(index) = self.balls.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        if self.balls[index].is_cue() {
            log::warn!("Refusing to remove the cue ball");
            return Ok(None);
        }
        if let Some(body) = self.balls[index].body {
            engine.remove_body(body)?;
        }
        Ok(Some(self.balls.remove(index)))
    }

    /// Snapshot of every live ball in creation order
    pub fn all(&self) -> Vec<Ball> {
        self.balls.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Live balls other than the cue ball
    pub fn object_ball_count(&self) -> usize {
        self.balls.iter().filter(|b| !b.is_cue()).count()
    }

    /// Move a ball and stop it dead
    pub fn relocate<E: PhysicsEngine>(
        &mut self,
        id: BallId,
        pos: Vec2,
        engine: &mut E,
    ) -> Result<(), PhysicsError> {
        let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) else {
            return Ok(());
        };
        if let Some(body) = ball.body {
            engine.set_position(body, pos)?;
            engine.set_velocity(body, Vec2::ZERO)?;
        }
        ball.pos = pos;
        ball.vel = Vec2::ZERO;
        Ok(())
    }

    /// Pull positions and velocities back from the engine
    pub fn sync<E: PhysicsEngine>(&mut self, engine: &E) {
        for ball in &mut self.balls {
            let Some(body) = ball.body else {
                continue;
            };
            if let Some(pos) = engine.position(body) {
                ball.pos = pos;
            }
            if let Some(vel) = engine.velocity(body) {
                ball.vel = vel;
            }
        }
    }

    /// Whether every ball has come to rest
    pub fn all_settled(&self, epsilon: f32) -> bool {
        self.balls.iter().all(|b| b.is_settled(epsilon))
    }

    /// Remove every ball, cue ball included (rack teardown)
    ///
    /// Balls leave the registry only once their body is gone, so a failure
    /// leaves every remaining ball still tracked.
    pub fn clear<E: PhysicsEngine>(&mut self, engine: &mut E) -> Result<(), PhysicsError> {
        while let Some(ball) = self.balls.last() {
            if let Some(body) = ball.body {
                engine.remove_body(body)?;
            }
            self.balls.pop();
        }
        Ok(())
    }
}
