//! Rapier2D-backed physics engine
//!
//! Wraps the Rapier pipeline boilerplate behind [`PhysicsEngine`]. Bodies are
//! addressed through stable [`BodyHandle`]s handed out in creation order.

use std::collections::BTreeMap;

use glam::Vec2;
use rapier2d::prelude::*;

use super::{BodyHandle, CircleDesc, PhysicsEngine, PhysicsError, PlanarPivot, PolygonDesc};

// ---------------------------------------------------------------------------
// Conversion helpers, glam <-> nalgebra
// ---------------------------------------------------------------------------

fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn to_point(v: Vec2) -> Point<Real> {
    point![v.x, v.y]
}

fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Bookkeeping for one body we created
#[derive(Debug, Clone, Copy)]
struct BodyEntry {
    rigid: RigidBodyHandle,
    mass: f32,
    pivot: Option<PlanarPivot>,
}

/// Zero-gravity top-down table world
pub struct RapierEngine {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    entries: BTreeMap<BodyHandle, BodyEntry>,
    next_handle: u32,
}

impl Default for RapierEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierEngine {
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            entries: BTreeMap::new(),
            next_handle: 1,
        }
    }

    fn register(&mut self, rigid: RigidBodyHandle, mass: f32, pivot: Option<PlanarPivot>) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.insert(handle, BodyEntry { rigid, mass, pivot });
        handle
    }

    fn rigid_mut(&mut self, body: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        let entry = self
            .entries
            .get(&body)
            .ok_or(PhysicsError::UnknownBody(body))?;
        self.bodies
            .get_mut(entry.rigid)
            .ok_or(PhysicsError::UnknownBody(body))
    }

    fn rigid(&self, body: BodyHandle) -> Option<&RigidBody> {
        let entry = self.entries.get(&body)?;
        self.bodies.get(entry.rigid)
    }

    /// Pivot resistance: bleed speed off every pinned body
    fn apply_pivots(&mut self, dt: f32) {
        for entry in self.entries.values() {
            let Some(pivot) = entry.pivot else {
                continue;
            };
            if let Some(rb) = self.bodies.get_mut(entry.rigid) {
                let vel = from_na(rb.linvel());
                if vel != Vec2::ZERO {
                    let damped = pivot.damp(vel, entry.mass, dt);
                    rb.set_linvel(to_na(damped), false);
                }
            }
        }
    }
}

impl PhysicsEngine for RapierEngine {
    fn add_circle(&mut self, desc: &CircleDesc) -> Result<BodyHandle, PhysicsError> {
        desc.validate()?;

        let rb = RigidBodyBuilder::dynamic()
            .translation(to_na(desc.position))
            .ccd_enabled(true)
            .build();
        let rigid = self.bodies.insert(rb);

        let collider = ColliderBuilder::ball(desc.radius)
            .restitution(desc.elasticity)
            .friction(0.0)
            .mass(desc.mass)
            .build();
        self.colliders
            .insert_with_parent(collider, rigid, &mut self.bodies);

        Ok(self.register(rigid, desc.mass, desc.pivot))
    }

    fn add_static_polygon(&mut self, desc: &PolygonDesc) -> Result<BodyHandle, PhysicsError> {
        let degenerate = PhysicsError::DegenerateCushion {
            vertices: desc.vertices.len(),
        };
        if desc.vertices.len() < 3 || desc.vertices.iter().any(|v| !v.is_finite()) {
            return Err(degenerate);
        }

        let points: Vec<Point<Real>> = desc.vertices.iter().map(|v| to_point(*v)).collect();
        let collider = ColliderBuilder::convex_hull(&points)
            .ok_or(degenerate)?
            .restitution(desc.elasticity)
            .friction(0.0)
            .build();

        let rigid = self.bodies.insert(RigidBodyBuilder::fixed().build());
        self.colliders
            .insert_with_parent(collider, rigid, &mut self.bodies);

        Ok(self.register(rigid, 0.0, None))
    }

    fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        let entry = self
            .entries
            .remove(&body)
            .ok_or(PhysicsError::UnknownBody(body))?;
        self.bodies.remove(
            entry.rigid,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        Ok(())
    }

    fn apply_impulse_at_local_point(
        &mut self,
        body: BodyHandle,
        impulse: Vec2,
        point: Vec2,
    ) -> Result<(), PhysicsError> {
        let rb = self.rigid_mut(body)?;
        let world_point = rb.position().transform_point(&to_point(point));
        rb.apply_impulse_at_point(to_na(impulse), world_point, true);
        Ok(())
    }

    fn set_position(&mut self, body: BodyHandle, pos: Vec2) -> Result<(), PhysicsError> {
        let rb = self.rigid_mut(body)?;
        rb.set_translation(to_na(pos), true);
        Ok(())
    }

    fn set_velocity(&mut self, body: BodyHandle, vel: Vec2) -> Result<(), PhysicsError> {
        let rb = self.rigid_mut(body)?;
        rb.set_linvel(to_na(vel), true);
        rb.set_angvel(0.0, true);
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.apply_pivots(dt);

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.rigid(body).map(|rb| from_na(rb.translation()))
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.rigid(body).map(|rb| from_na(rb.linvel()))
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }
}
