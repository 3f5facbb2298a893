//! Static table geometry: cushions, pockets and the rack formation
//!
//! Coordinates are screen space (origin top-left, Y down), matching the
//! pointer coordinates the cue is aimed with.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::physics::{BodyHandle, PhysicsEngine, PhysicsError, PolygonDesc};

/// Number of columns in the rack triangle (5, 4, 3, 2, 1 balls)
pub const RACK_COLUMNS: usize = 5;
/// Gap added between neighbouring balls in a column
pub const RACK_GAP: f32 = 2.0;

/// A pocket: fixed centre and capture radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub center: Vec2,
    pub radius: f32,
}

impl Pocket {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether a ball centred at `pos` has dropped into this pocket
    pub fn captures(&self, pos: Vec2) -> bool {
        pos.distance(self.center) <= self.radius
    }
}

/// Static polygonal cushion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cushion {
    pub vertices: Vec<Vec2>,
}

/// Fixed table layout for the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableLayout {
    pub width: f32,
    pub height: f32,
    pub cushions: Vec<Cushion>,
    pub pockets: Vec<Pocket>,
    /// First (top-left) ball of the rack
    pub rack_origin: Vec2,
    /// Where the cue ball starts and respawns after a scratch
    pub cue_spawn: Vec2,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::standard()
    }
}

impl TableLayout {
    /// The one table this game is played on
    pub fn standard() -> Self {
        Self::with_pocket_radius(POCKET_RADIUS)
    }

    pub fn with_pocket_radius(pocket_radius: f32) -> Self {
        let cushion = |pts: [(f32, f32); 4]| Cushion {
            vertices: pts.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
        };
        let cushions = vec![
            // Top rail, either side of the middle pocket
            cushion([(88.0, 56.0), (109.0, 77.0), (555.0, 77.0), (564.0, 56.0)]),
            cushion([(621.0, 56.0), (630.0, 77.0), (1081.0, 77.0), (1102.0, 56.0)]),
            // Bottom rail
            cushion([(89.0, 621.0), (110.0, 600.0), (556.0, 600.0), (564.0, 621.0)]),
            cushion([(622.0, 621.0), (630.0, 600.0), (1081.0, 600.0), (1102.0, 621.0)]),
            // Left and right rails
            cushion([(56.0, 96.0), (77.0, 117.0), (77.0, 560.0), (56.0, 581.0)]),
            cushion([(1143.0, 96.0), (1122.0, 117.0), (1122.0, 560.0), (1143.0, 581.0)]),
        ];

        let pockets = [
            (55.0, 63.0),
            (592.0, 48.0),
            (1134.0, 64.0),
            (55.0, 616.0),
            (592.0, 629.0),
            (1134.0, 616.0),
        ]
        .iter()
        .map(|&(x, y)| Pocket::new(Vec2::new(x, y), pocket_radius))
        .collect();

        Self {
            width: TABLE_WIDTH,
            height: TABLE_HEIGHT,
            cushions,
            pockets,
            rack_origin: RACK_ORIGIN,
            cue_spawn: CUE_SPAWN,
        }
    }

    /// Object-ball positions in rack slot order.
    ///
    /// Columns run left to right holding 5, 4, 3, 2, 1 balls. Each column is
    /// shifted down by half a diameter per column index so the triangle
    /// closes toward the cue ball side.
    pub fn rack_positions(&self, diameter: f32) -> Vec<Vec2> {
        let spacing = diameter + RACK_GAP;
        let mut positions = Vec::with_capacity(OBJECT_BALLS);
        for col in 0..RACK_COLUMNS {
            let rows = RACK_COLUMNS - col;
            for row in 0..rows {
                positions.push(Vec2::new(
                    self.rack_origin.x + col as f32 * spacing,
                    self.rack_origin.y + row as f32 * spacing + col as f32 * diameter / 2.0,
                ));
            }
        }
        positions
    }

    /// Register every cushion as a static body. Any failure aborts setup.
    pub fn register_cushions<E: PhysicsEngine>(
        &self,
        engine: &mut E,
        elasticity: f32,
    ) -> Result<Vec<BodyHandle>, PhysicsError> {
        self.cushions
            .iter()
            .map(|c| {
                engine.add_static_polygon(&PolygonDesc {
                    vertices: c.vertices.clone(),
                    elasticity,
                })
            })
            .collect()
    }
}
