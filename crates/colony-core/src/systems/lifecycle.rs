//! Lifecycle Systems
//!
//! Compound regeneration, wild microbe drift, and corpse cleanup.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::Rng;

use crate::components::organism::{Capability, Colony, Compound, Compounds};
use crate::components::world::{Corpse, Microbe, Position};
use crate::config::ExecutorConfig;
use crate::{SimRng, SimulationState};

/// System to refill oxytoxy for colonies with toxisome members
pub fn regenerate_compounds(
    sim: Res<SimulationState>,
    config: Res<ExecutorConfig>,
    mut organisms: Query<(&Colony, &Microbe, &mut Compounds)>,
) {
    for (colony, microbe, mut compounds) in organisms.iter_mut() {
        if microbe.dead {
            continue;
        }
        let producers = colony
            .members
            .iter()
            .filter(|member| member.has(Capability::Toxisome))
            .count();
        if producers == 0 {
            continue;
        }

        let held = compounds.amount(Compound::Oxytoxy);
        let gain = config.oxytoxy_regen * producers as f32 * sim.dt;
        let room = (config.oxytoxy_capacity - held).max(0.0);
        compounds.add(Compound::Oxytoxy, gain.min(room));
    }
}

/// System moving living wild microbes on a random walk
pub fn drift_microbes(
    mut rng: ResMut<SimRng>,
    sim: Res<SimulationState>,
    config: Res<ExecutorConfig>,
    mut microbes: Query<(&mut Position, &Microbe), Without<Colony>>,
) {
    let step = config.drift_speed * sim.dt;
    for (mut position, microbe) in microbes.iter_mut() {
        if microbe.dead {
            continue;
        }
        let angle: f32 = rng.0.gen_range(0.0..std::f32::consts::TAU);
        position.0 += Vec3::new(angle.cos(), 0.0, angle.sin()) * step;
    }
}

/// System to remove corpses that have lingered long enough
pub fn cleanup_corpses(
    mut commands: Commands,
    sim: Res<SimulationState>,
    config: Res<ExecutorConfig>,
    corpses: Query<(Entity, &Corpse)>,
) {
    for (entity, corpse) in corpses.iter() {
        if sim.current_tick.saturating_sub(corpse.died_at) >= config.corpse_ticks {
            commands.entity(entity).despawn();
        }
    }
}
