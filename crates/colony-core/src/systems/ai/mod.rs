//! Organism AI
//!
//! Per-tick behavior selection for colonial organisms. Each colony owns one
//! [`OrganismAi`] that either sticks with an in-progress pursuit or picks a new
//! behavior (wander, toxin pursuit, bite pursuit, grazing on chunks) from what
//! it senses, and emits one [`OrganismCommand`] for the executor.
//!
//! The selector is pure decision logic: it reads an [`OrganismView`] and a
//! [`SensedWorld`], mutates only its own state, and never touches the world.

pub mod command;
pub mod select;
pub mod sense;
pub mod state;
pub mod steering;

pub use command::OrganismCommand;
pub use select::{AiResponse, Behavior};
pub use sense::{
    chunks_worth_eating, prey_candidates, ChunkView, MicrobeView, OrganismView, SensedWorld,
    Snapshot,
};
pub use state::{AbandonedPursuit, OrganismAi, Pursuit};
pub use steering::{heading_point, planar_angle, relative_move_direction, to_world_direction};

/// Behavior tuning constants
pub mod tuning {
    /// Default frustration at which a pursuit is dropped
    pub const DEFAULT_FRUSTRATION_THRESHOLD: f32 = 100.0;
    /// Squared distance under which the migration goal counts as reached
    pub const MIGRATION_ARRIVAL_DISTANCE_SQ: f32 = 100.0;
    /// Max offset of a new migration goal on each ground axis
    pub const MIGRATION_MAX_OFFSET: f32 = 200.0;
    /// Squared sensing range for prey
    pub const PREY_RANGE_SQ: f32 = 1500.0;
    /// Squared sensing range for chunks
    pub const CHUNK_RANGE_SQ: f32 = 1000.0;
    /// Oxytoxy needed (exclusive) before a toxin pursuit is started
    pub const TOXIN_RESERVE_MIN: f32 = 4.0;
    /// Frustration seed of a fresh bite pursuit, distinguishes it from a reset slot
    pub const BITE_FRUSTRATION_SEED: f32 = 1.0;
    /// Frustration added per bite pursuit tick
    pub const BITE_FRUSTRATION_PER_TICK: f32 = 5.0;
    /// Frustration added per engaged toxin pursuit tick
    pub const TOXIN_FRUSTRATION_PER_TICK: f32 = 10.0;
    /// Squared look-at-to-target distance under which the colony worries the target
    pub const BITE_WORRY_DISTANCE_SQ: f32 = 100.0;
    /// Bite pursuit gives up when closer than this (squared)
    pub const BITE_MIN_DISTANCE_SQ: f32 = 100.0;
    /// Bite pursuit gives up when farther than this (squared)
    pub const BITE_MAX_DISTANCE_SQ: f32 = 2000.0;
    /// Turn applied while worrying a bite target, sign picked by coin flip
    pub const BITE_JITTER_TURN: f32 = 1.2;
    /// Turn applied when steering toward a chunk
    pub const GRAZE_TURN: f32 = 0.5;
    /// Distance of the look-at point placed by a turn
    pub const TURN_LOOK_DISTANCE: f32 = 1000.0;
}
