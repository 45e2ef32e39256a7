//! Command Execution Systems
//!
//! A simple stand-in for the game's movement and attack engine: applies queued
//! organism commands, resolves toxin shots and bites, and lets colonies eat
//! chunks they touch.

use bevy_ecs::prelude::*;
use glam::Vec3;
use std::collections::HashSet;

use colony_events::{DecisionEvent, EventType};

use crate::components::organism::{Capability, Colony, Compound, Compounds};
use crate::components::world::{Chunk, Corpse, Facing, Microbe, Position, SpeciesId};
use crate::config::ExecutorConfig;
use crate::events::TickEvents;
use crate::systems::ai::{to_world_direction, OrganismAi};
use crate::systems::decide::PendingCommands;
use crate::SimulationState;

/// A toxin shot waiting to be resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxinShot {
    pub shooter: Entity,
    pub origin: Vec3,
    pub aim: Vec3,
}

/// Resource: toxin shots fired this tick
#[derive(Resource, Debug, Default)]
pub struct ToxinShots {
    pub shots: Vec<ToxinShot>,
}

impl ToxinShots {
    pub fn new() -> Self {
        Self::default()
    }
}

/// System to apply each colony's command: facing, movement, toxin use
pub fn execute_commands(
    sim: Res<SimulationState>,
    config: Res<ExecutorConfig>,
    mut pending: ResMut<PendingCommands>,
    mut shots: ResMut<ToxinShots>,
    mut tick_events: ResMut<TickEvents>,
    mut organisms: Query<(&mut Position, &mut Facing, &mut Compounds), With<OrganismAi>>,
) {
    // HashMap drain order is arbitrary; sort so shots resolve deterministically
    let mut commands: Vec<_> = pending.drain().collect();
    commands.sort_by_key(|(entity, _)| entity.to_bits());

    for (entity, command) in commands {
        let Ok((mut position, mut facing, mut compounds)) = organisms.get_mut(entity) else {
            continue;
        };

        if let Some(look_at) = command.look_at {
            facing.look_at = look_at;
        }

        if let Some(relative) = command.move_direction {
            let direction = to_world_direction(position.0, facing.look_at, relative);
            position.0 += direction * config.move_speed * sim.dt;
        }

        if let Some(aim) = command.fire_toxin_at {
            if compounds.amount(Compound::Oxytoxy) >= config.toxin_cost {
                compounds.take(Compound::Oxytoxy, config.toxin_cost);
                shots.shots.push(ToxinShot {
                    shooter: entity,
                    origin: position.0,
                    aim,
                });
                tick_events.push(
                    DecisionEvent::new(sim.current_tick, entity.to_bits(), EventType::ToxinFired)
                        .with_position(aim.to_array()),
                );
            }
        }
    }
}

/// System to resolve toxin shots against live microbes
pub fn apply_toxin_hits(
    mut commands: Commands,
    sim: Res<SimulationState>,
    config: Res<ExecutorConfig>,
    mut shots: ResMut<ToxinShots>,
    mut tick_events: ResMut<TickEvents>,
    mut microbes: Query<(Entity, &Position, &mut Microbe)>,
) {
    for shot in shots.shots.drain(..) {
        if shot.origin.distance(shot.aim) > config.toxin_range {
            continue;
        }

        let hit = microbes
            .iter_mut()
            .filter(|(entity, position, microbe)| {
                *entity != shot.shooter
                    && !microbe.dead
                    && position.0.distance(shot.aim) <= config.toxin_hit_radius
            })
            .min_by(|a, b| {
                let da = a.1 .0.distance_squared(shot.aim);
                let db = b.1 .0.distance_squared(shot.aim);
                da.total_cmp(&db)
            });

        if let Some((entity, _, mut microbe)) = hit {
            microbe.dead = true;
            commands.entity(entity).insert(Corpse {
                died_at: sim.current_tick,
            });
            tick_events.push(
                DecisionEvent::new(sim.current_tick, shot.shooter.to_bits(), EventType::PreyKilled)
                    .with_target(entity.to_bits())
                    .with_position(shot.aim.to_array()),
            );
        }
    }
}

/// System letting colonies with a pilus bite foreign microbes they touch
pub fn apply_bites(
    mut commands: Commands,
    sim: Res<SimulationState>,
    config: Res<ExecutorConfig>,
    mut tick_events: ResMut<TickEvents>,
    mut set: ParamSet<(
        Query<(Entity, &Position, &Microbe, &Colony)>,
        Query<(Entity, &Position, &mut Microbe)>,
    )>,
) {
    let biters: Vec<(Entity, Vec3, SpeciesId)> = set
        .p0()
        .iter()
        .filter(|(_, _, microbe, colony)| !microbe.dead && colony.any_member_has(Capability::Pilus))
        .map(|(entity, position, microbe, _)| (entity, position.0, microbe.species))
        .collect();

    let radius_sq = config.bite_radius * config.bite_radius;
    for (biter, origin, species) in biters {
        let mut microbes = set.p1();
        for (entity, position, mut microbe) in microbes.iter_mut() {
            if entity == biter
                || microbe.dead
                || microbe.species == species
                || position.0.distance_squared(origin) > radius_sq
            {
                continue;
            }

            microbe.dead = true;
            commands.entity(entity).insert(Corpse {
                died_at: sim.current_tick,
            });
            tick_events.push(
                DecisionEvent::new(sim.current_tick, biter.to_bits(), EventType::PreyKilled)
                    .with_target(entity.to_bits())
                    .with_position(position.0.to_array()),
            );
        }
    }
}

/// System letting colonies eat edible chunks they touch
pub fn eat_chunks(
    mut commands: Commands,
    sim: Res<SimulationState>,
    config: Res<ExecutorConfig>,
    mut tick_events: ResMut<TickEvents>,
    chunks: Query<(Entity, &Position, &Chunk)>,
    mut organisms: Query<(Entity, &Position, &Microbe, &mut Compounds), With<Colony>>,
) {
    let radius_sq = config.eat_radius * config.eat_radius;
    let mut eaten = HashSet::new();

    for (organism, origin, microbe, mut compounds) in organisms.iter_mut() {
        if microbe.dead {
            continue;
        }
        for (chunk_entity, position, chunk) in chunks.iter() {
            if eaten.contains(&chunk_entity) || position.0.distance_squared(origin.0) > radius_sq {
                continue;
            }
            let Some(contents) = &chunk.compounds else {
                continue;
            };

            compounds.absorb(contents);
            eaten.insert(chunk_entity);
            commands.entity(chunk_entity).despawn();
            tick_events.push(
                DecisionEvent::new(sim.current_tick, organism.to_bits(), EventType::ChunkEaten)
                    .with_target(chunk_entity.to_bits())
                    .with_position(position.0.to_array()),
            );
        }
    }
}
