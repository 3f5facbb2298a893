//! Deterministic engine for unit tests
//!
//! No collisions: bodies drift along their velocity and pinned bodies lose
//! speed through their pivot, so tests can place balls exactly where needed.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{BodyHandle, CircleDesc, PhysicsEngine, PhysicsError, PlanarPivot, PolygonDesc};

#[derive(Debug, Clone)]
pub(crate) struct ScriptedBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub pivot: Option<PlanarPivot>,
    pub is_static: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedEngine {
    bodies: BTreeMap<BodyHandle, ScriptedBody>,
    next_handle: u32,
    pub steps: u64,
    pub impulses: Vec<(BodyHandle, Vec2)>,
    /// Fail the n-th (0-based) dynamic body creation
    pub fail_circle_at: Option<usize>,
    circles_created: usize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            ..Default::default()
        }
    }

    fn insert(&mut self, body: ScriptedBody) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(handle, body);
        handle
    }

    fn body_mut(&mut self, body: BodyHandle) -> Result<&mut ScriptedBody, PhysicsError> {
        self.bodies
            .get_mut(&body)
            .ok_or(PhysicsError::UnknownBody(body))
    }

    /// Place a body and give it a velocity in one go
    pub fn place(&mut self, body: BodyHandle, pos: Vec2, vel: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.pos = pos;
            b.vel = vel;
        }
    }

    pub fn static_count(&self) -> usize {
        self.bodies.values().filter(|b| b.is_static).count()
    }
}

impl PhysicsEngine for ScriptedEngine {
    fn add_circle(&mut self, desc: &CircleDesc) -> Result<BodyHandle, PhysicsError> {
        desc.validate()?;
        if self.fail_circle_at == Some(self.circles_created) {
            return Err(PhysicsError::InvalidBody {
                reason: "scripted failure",
            });
        }
        self.circles_created += 1;
        Ok(self.insert(ScriptedBody {
            pos: desc.position,
            vel: Vec2::ZERO,
            mass: desc.mass,
            pivot: desc.pivot,
            is_static: false,
        }))
    }

    fn add_static_polygon(&mut self, desc: &PolygonDesc) -> Result<BodyHandle, PhysicsError> {
        if desc.vertices.len() < 3 {
            return Err(PhysicsError::DegenerateCushion {
                vertices: desc.vertices.len(),
            });
        }
        let centroid = desc.vertices.iter().copied().sum::<Vec2>() / desc.vertices.len() as f32;
        Ok(self.insert(ScriptedBody {
            pos: centroid,
            vel: Vec2::ZERO,
            mass: 0.0,
            pivot: None,
            is_static: true,
        }))
    }

    fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        self.bodies
            .remove(&body)
            .map(|_| ())
            .ok_or(PhysicsError::UnknownBody(body))
    }

    fn apply_impulse_at_local_point(
        &mut self,
        body: BodyHandle,
        impulse: Vec2,
        _point: Vec2,
    ) -> Result<(), PhysicsError> {
        let b = self.body_mut(body)?;
        b.vel += impulse / b.mass;
        self.impulses.push((body, impulse));
        Ok(())
    }

    fn set_position(&mut self, body: BodyHandle, pos: Vec2) -> Result<(), PhysicsError> {
        self.body_mut(body)?.pos = pos;
        Ok(())
    }

    fn set_velocity(&mut self, body: BodyHandle, vel: Vec2) -> Result<(), PhysicsError> {
        self.body_mut(body)?.vel = vel;
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        for body in self.bodies.values_mut().filter(|b| !b.is_static) {
            if let Some(pivot) = body.pivot {
                body.vel = pivot.damp(body.vel, body.mass, dt);
            }
            body.pos += body.vel * dt;
        }
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.pos)
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.vel)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
