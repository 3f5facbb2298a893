//! Rigid-body engine seam
//!
//! The match simulation never touches a solver directly. It creates bodies,
//! applies impulses, steps and reads back state through [`PhysicsEngine`].

#[cfg(feature = "physics")]
pub mod rapier;
#[cfg(test)]
pub(crate) mod scripted;

#[cfg(feature = "physics")]
pub use rapier::RapierEngine;

use std::fmt;

use glam::Vec2;

/// Opaque engine-assigned body handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(pub u32);

/// Zero-bias pivot pinning a body to the table plane.
///
/// The pivot never pulls a body back to its anchor; it only resists motion
/// with at most `max_force`, which reads as rolling friction on the cloth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPivot {
    pub max_force: f32,
}

impl PlanarPivot {
    /// Speed removed from a body of `mass` over one step of `dt`
    pub fn speed_loss(&self, mass: f32, dt: f32) -> f32 {
        self.max_force * dt / mass
    }

    /// Velocity after the pivot has resisted motion for one step
    pub fn damp(&self, vel: Vec2, mass: f32, dt: f32) -> Vec2 {
        let speed = vel.length();
        let loss = self.speed_loss(mass, dt);
        if speed <= loss {
            Vec2::ZERO
        } else {
            vel * ((speed - loss) / speed)
        }
    }
}

/// Dynamic circular body description
#[derive(Debug, Clone, Copy)]
pub struct CircleDesc {
    pub position: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub elasticity: f32,
    pub pivot: Option<PlanarPivot>,
}

impl CircleDesc {
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.position.is_finite() {
            return Err(PhysicsError::InvalidBody {
                reason: "non-finite position",
            });
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(PhysicsError::InvalidBody {
                reason: "radius must be positive",
            });
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(PhysicsError::InvalidBody {
                reason: "mass must be positive",
            });
        }
        Ok(())
    }
}

/// Static polygon description (world-space vertices)
#[derive(Debug, Clone)]
pub struct PolygonDesc {
    pub vertices: Vec<Vec2>,
    pub elasticity: f32,
}

/// Engine failures. All of them are fatal to match setup.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Cushion polygon could not be turned into a collider
    DegenerateCushion { vertices: usize },
    /// Body description rejected before creation
    InvalidBody { reason: &'static str },
    /// Handle does not refer to a live body
    UnknownBody(BodyHandle),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::DegenerateCushion { vertices } => {
                write!(f, "degenerate cushion polygon ({vertices} vertices)")
            }
            PhysicsError::InvalidBody { reason } => write!(f, "invalid body: {reason}"),
            PhysicsError::UnknownBody(handle) => write!(f, "unknown body handle {}", handle.0),
        }
    }
}

impl std::error::Error for PhysicsError {}

/// The rigid-body collaborator driven by the match simulation
pub trait PhysicsEngine {
    /// Create a dynamic circle, optionally pinned to the table plane
    fn add_circle(&mut self, desc: &CircleDesc) -> Result<BodyHandle, PhysicsError>;

    /// Create a static polygon (cushions)
    fn add_static_polygon(&mut self, desc: &PolygonDesc) -> Result<BodyHandle, PhysicsError>;

    /// Remove a body and everything attached to it
    fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError>;

    /// Apply an instantaneous impulse at a point in body-local coordinates
    fn apply_impulse_at_local_point(
        &mut self,
        body: BodyHandle,
        impulse: Vec2,
        point: Vec2,
    ) -> Result<(), PhysicsError>;

    /// Teleport a body
    fn set_position(&mut self, body: BodyHandle, pos: Vec2) -> Result<(), PhysicsError>;

    fn set_velocity(&mut self, body: BodyHandle, vel: Vec2) -> Result<(), PhysicsError>;

    /// Advance the simulation by exactly `dt` seconds
    fn step(&mut self, dt: f32);

    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;

    /// Number of live bodies (static and dynamic)
    fn body_count(&self) -> usize;
}
