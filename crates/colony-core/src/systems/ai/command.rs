//! Organism Command
//!
//! The per-tick output of the selector.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::steering::relative_move_direction;

/// Movement/attack command for one organism for one tick.
///
/// Built fresh every tick and handed to the executor; never retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganismCommand {
    /// World point the organism should orient toward
    pub look_at: Option<Vec3>,
    /// Unit vector relative to the facing given by `look_at`
    pub move_direction: Option<Vec3>,
    /// World point to fire toxin at
    pub fire_toxin_at: Option<Vec3>,
}

impl OrganismCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `move_direction` so the organism at `origin` heads for `target`
    /// while facing the current `look_at`.
    ///
    /// Does nothing when no look-at has been chosen yet this tick.
    pub fn move_towards(&mut self, origin: Vec3, target: Vec3) {
        if let Some(look_at) = self.look_at {
            self.move_direction = Some(relative_move_direction(origin, look_at, target));
        }
    }

    /// True when the command asks for a toxin shot
    pub fn fires(&self) -> bool {
        self.fire_toxin_at.is_some()
    }
}
