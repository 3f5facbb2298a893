//! Difficulty selection and simulation tuning
//!
//! Values are fixed for a session; `Settings::default()` mirrors `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty chosen from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hardcore,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hardcore];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hardcore => "Hardcore",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hardcore" | "hard" => Some(Difficulty::Hardcore),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(key), None) => Self::from_key(key),
                    _ => None,
                }
            }
        }
    }

    /// Menu hotkey mapping ('1', '2', '3')
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Difficulty::Easy),
            '2' => Some(Difficulty::Normal),
            '3' => Some(Difficulty::Hardcore),
            _ => None,
        }
    }

    /// Starting lives
    pub fn lives(&self) -> u8 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => 3,
            Difficulty::Hardcore => 1,
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // === Timing ===
    /// Seconds per physics step
    pub dt: f32,

    // === Balls ===
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_elasticity: f32,
    /// Planar pivot max force (acts as cloth friction)
    pub pivot_max_force: f32,

    // === Table ===
    pub cushion_elasticity: f32,
    pub pocket_radius: f32,

    // === Cue ===
    pub max_force: f32,
    pub force_step: f32,

    /// Per-component speed below which a ball counts as settled
    pub settle_epsilon: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dt: SIM_DT,

            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            ball_elasticity: ELASTICITY,
            pivot_max_force: PIVOT_MAX_FORCE,

            cushion_elasticity: ELASTICITY,
            pocket_radius: POCKET_RADIUS,

            max_force: MAX_FORCE,
            force_step: FORCE_STEP,

            settle_epsilon: SETTLE_EPSILON,
        }
    }
}

impl Settings {
    pub fn ball_diameter(&self) -> f32 {
        self.ball_radius * 2.0
    }

    /// Pretty JSON dump for startup logging
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
