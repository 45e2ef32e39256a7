//! ECS Systems
//!
//! Perception, behavior selection, command execution, and lifecycle systems.

pub mod ai;
pub mod decide;
pub mod execute;
pub mod lifecycle;
pub mod perception;

use bevy_ecs::prelude::*;

pub use decide::{decide_organism_behavior, PendingCommands};
pub use execute::{apply_bites, apply_toxin_hits, eat_chunks, execute_commands, ToxinShot, ToxinShots};
pub use lifecycle::{cleanup_corpses, drift_microbes, regenerate_compounds};
pub use perception::{build_entity_index, EntityIndex};

/// Build the per-tick schedule.
///
/// 1. Index what every colony can sense
/// 2. Run behavior selection
/// 3. Apply commands, then resolve attacks and feeding
/// 4. Regenerate, drift, and clean up
pub fn tick_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems(
        (
            build_entity_index,
            decide_organism_behavior,
            execute_commands,
            apply_toxin_hits,
            apply_bites,
            eat_chunks,
            regenerate_compounds,
            drift_microbes,
            cleanup_corpses,
        )
            .chain(),
    );

    schedule
}
