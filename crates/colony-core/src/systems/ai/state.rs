//! Strategy State
//!
//! Persistent per-organism AI state: wander goal, the two pursuit slots and
//! their frustration, and the running heading used by turns.

use bevy_ecs::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use colony_events::PursuitKind;

use crate::components::organism::{Colony, LocomotionMode};
use crate::components::world::EntityId;

use super::tuning;

/// One pursuit slot: a weakly held target and the frustration built up chasing it
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pursuit {
    pub target: Option<EntityId>,
    pub frustration: f32,
}

impl Pursuit {
    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn arm(&mut self, target: EntityId) {
        self.target = Some(target);
    }

    /// Clear the slot if frustration has reached `threshold`.
    ///
    /// Returns the slot as it was just before clearing.
    pub fn expire_if_frustrated(&mut self, threshold: f32) -> Option<Pursuit> {
        if self.frustration < threshold {
            return None;
        }
        Some(std::mem::take(self))
    }
}

/// A pursuit slot cleared by frustration, with the target it was chasing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbandonedPursuit {
    pub kind: PursuitKind,
    pub target: Option<EntityId>,
    pub frustration: f32,
}

/// Component: the behavior selector's state for one colony.
///
/// Created once when the colony forms and mutated every tick by
/// [`OrganismAi::organism_behavior`](super::select).
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismAi {
    /// Any member has a forward pilus. Refreshed when no pursuit is running.
    pub can_bite: bool,
    pub frustration_threshold: f32,
    pub(super) migration_goal: Option<Vec3>,
    pub(super) toxin_pursuit: Pursuit,
    pub(super) bite_pursuit: Pursuit,
    pub(super) facing_angle: f32,
}

impl OrganismAi {
    /// Take control of a colony. Every member is put back into normal
    /// locomotion.
    pub fn new(colony: &mut Colony, frustration_threshold: f32) -> Self {
        for member in &mut colony.members {
            member.mode = LocomotionMode::Normal;
        }

        Self {
            can_bite: false,
            frustration_threshold,
            migration_goal: None,
            toxin_pursuit: Pursuit::default(),
            bite_pursuit: Pursuit::default(),
            facing_angle: 0.0,
        }
    }

    /// Start with a fixed wander destination instead of a random one
    pub fn with_migration_goal(mut self, goal: Vec3) -> Self {
        self.migration_goal = Some(goal);
        self
    }

    pub fn migration_goal(&self) -> Option<Vec3> {
        self.migration_goal
    }

    pub fn pursuit(&self, kind: PursuitKind) -> &Pursuit {
        match kind {
            PursuitKind::Toxin => &self.toxin_pursuit,
            PursuitKind::Bite => &self.bite_pursuit,
        }
    }

    pub(super) fn pursuit_mut(&mut self, kind: PursuitKind) -> &mut Pursuit {
        match kind {
            PursuitKind::Toxin => &mut self.toxin_pursuit,
            PursuitKind::Bite => &mut self.bite_pursuit,
        }
    }

    pub fn facing_angle(&self) -> f32 {
        self.facing_angle
    }

    /// The pursuit whose continuation runs this tick, if any. Bite wins over toxin.
    pub fn active_pursuit(&self) -> Option<PursuitKind> {
        if self.bite_pursuit.is_active() {
            Some(PursuitKind::Bite)
        } else if self.toxin_pursuit.is_active() {
            Some(PursuitKind::Toxin)
        } else {
            None
        }
    }

    /// Clear every slot that reached the frustration threshold.
    ///
    /// Returns the slots that were abandoned.
    pub fn expire_frustrated_pursuits(&mut self) -> Vec<AbandonedPursuit> {
        let threshold = self.frustration_threshold;
        [PursuitKind::Toxin, PursuitKind::Bite]
            .into_iter()
            .filter_map(|kind| {
                let cleared = self.pursuit_mut(kind).expire_if_frustrated(threshold)?;
                Some(AbandonedPursuit {
                    kind,
                    target: cleared.target,
                    frustration: cleared.frustration,
                })
            })
            .collect()
    }

    /// True if a pursuit is still running after expiry
    pub fn has_existing_strategy(&self) -> bool {
        self.active_pursuit().is_some()
    }
}

impl Default for OrganismAi {
    fn default() -> Self {
        Self::new(&mut Colony::default(), tuning::DEFAULT_FRUSTRATION_THRESHOLD)
    }
}
