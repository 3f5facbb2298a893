//! Pocket capture detection
//!
//! Scans a snapshot of the live balls against every pocket. The cue ball is
//! respawned on the spot; object balls are queued and removed in one batch
//! after the scan, in registry (creation) order.

use glam::Vec2;

use super::registry::{BallId, BallRegistry};
use super::state::{MatchState, PottingReport};
use super::table::{Pocket, TableLayout};
use crate::physics::{PhysicsEngine, PhysicsError};

#[derive(Debug, Clone)]
pub struct PottingResolver {
    pockets: Vec<Pocket>,
    cue_respawn: Vec2,
}

impl PottingResolver {
    pub fn new(layout: &TableLayout) -> Self {
        Self {
            pockets: layout.pockets.clone(),
            cue_respawn: layout.cue_spawn,
        }
    }

    /// First pocket, in layout order, that a ball centred at `pos` drops into
    pub fn capturing_pocket(&self, pos: Vec2) -> Option<usize> {
        self.pockets.iter().position(|p| p.captures(pos))
    }

    /// Run one capture pass and apply its consequences.
    ///
    /// A scratched cue ball costs a life and goes back to the respawn point
    /// at rest. Captured object balls leave the registry and the engine and
    /// are appended to the potted list in capture order.
    pub fn resolve<E: PhysicsEngine>(
        &self,
        registry: &mut BallRegistry,
        engine: &mut E,
        state: &mut MatchState,
    ) -> Result<PottingReport, PhysicsError> {
        let mut report = PottingReport::default();
        let mut queued: Vec<(BallId, u8)> = Vec::new();

        for ball in registry.all() {
            let Some(pocket) = self.capturing_pocket(ball.pos) else {
                continue;
            };
            log::debug!("Slot {} dropped into pocket {}", ball.slot, pocket);
            if ball.is_cue() {
                report.cue_ball_potted = true;
                registry.relocate(ball.id, self.cue_respawn, engine)?;
            } else {
                queued.push((ball.id, ball.slot));
            }
        }

        for (id, slot) in queued {
            if registry.remove(id, engine)?.is_some() {
                report.potted.push(slot);
            }
        }

        if !report.is_empty() {
            state.record_potting(&report);
        }
        Ok(report)
    }
}
