//! Deterministic match simulation
//!
//! All gameplay logic lives here. Rigid-body dynamics are delegated to a
//! [`PhysicsEngine`](crate::physics::PhysicsEngine); everything else must be
//! pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by ball ID)
//! - No rendering or platform dependencies

pub mod potting;
pub mod registry;
pub mod shot;
pub mod snapshot;
pub mod state;
pub mod table;
pub mod tick;

pub use potting::PottingResolver;
pub use registry::{Ball, BallId, BallRegistry};
pub use shot::{PowerDirection, ShotController};
pub use snapshot::{BallSprite, CueSprite, FrameSnapshot, PowerGauge};
pub use state::{GameEvent, GamePhase, Interrupted, MatchState, Outcome, PottingReport};
pub use table::{Cushion, Pocket, TableLayout};
pub use tick::{Match, MatchError, TickInput};
