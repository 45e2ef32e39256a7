//! Decision System
//!
//! Runs each living colony's behavior selector against the entity index and
//! queues the resulting commands for execution.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

use colony_events::{DecisionEvent, EventType};

use crate::components::organism::{Colony, Compounds};
use crate::components::world::{Facing, Microbe, Position};
use crate::events::TickEvents;
use crate::systems::ai::{AiResponse, Behavior, OrganismAi, OrganismCommand, OrganismView, SensedWorld};
use crate::systems::perception::EntityIndex;
use crate::{SimRng, SimulationState};

/// Resource storing this tick's command for each colony
#[derive(Resource, Debug, Default)]
pub struct PendingCommands {
    /// Maps colony entity -> command
    pub commands: HashMap<Entity, OrganismCommand>,
}

impl PendingCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, entity: Entity, command: OrganismCommand) {
        self.commands.insert(entity, command);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (Entity, OrganismCommand)> + '_ {
        self.commands.drain()
    }
}

/// System to run behavior selection for every living colony
#[allow(clippy::type_complexity)]
pub fn decide_organism_behavior(
    mut rng: ResMut<SimRng>,
    sim: Res<SimulationState>,
    index: Res<EntityIndex>,
    mut pending: ResMut<PendingCommands>,
    mut tick_events: ResMut<TickEvents>,
    mut organisms: Query<(
        Entity,
        &Position,
        &Facing,
        &Microbe,
        &Colony,
        &Compounds,
        &mut OrganismAi,
    )>,
) {
    for (entity, position, facing, microbe, colony, compounds, mut ai) in organisms.iter_mut() {
        if microbe.dead {
            continue;
        }

        let view = OrganismView {
            position: position.0,
            look_at: facing.look_at,
            species: microbe.species,
            colony,
            compounds,
        };
        let response = ai.organism_behavior(sim.dt, &mut rng.0, &view, &*index);

        record_decision_events(
            &mut tick_events,
            sim.current_tick,
            entity,
            &ai,
            &response,
            &*index,
        );
        pending.set(entity, response.command);
    }
}

fn record_decision_events<W: SensedWorld>(
    tick_events: &mut TickEvents,
    tick: u64,
    entity: Entity,
    ai: &OrganismAi,
    response: &AiResponse,
    world: &W,
) {
    let organism = entity.to_bits();

    if let Some(goal) = response.new_migration_goal {
        tick_events.push(
            DecisionEvent::new(tick, organism, EventType::MigrationGoal).with_position(goal.to_array()),
        );
    }

    for abandoned in &response.abandoned {
        let mut event = DecisionEvent::new(tick, organism, EventType::PursuitAbandoned)
            .with_pursuit(abandoned.kind)
            .with_frustration(abandoned.frustration);
        if let Some(target) = abandoned.target {
            event = event.with_target(target.0);
        }
        tick_events.push(event);
    }

    match response.behavior {
        Behavior::Engage { kind, target } => {
            let mut event = DecisionEvent::new(tick, organism, EventType::PursuitStarted)
                .with_pursuit(kind)
                .with_target(target.0)
                .with_frustration(ai.pursuit(kind).frustration);
            if let Some(prey) = world.locate(target) {
                event = event.with_position(prey.position.to_array());
            }
            tick_events.push(event);
        }
        Behavior::Graze { chunk } => {
            let mut event = DecisionEvent::new(tick, organism, EventType::Grazing).with_target(chunk.0);
            if let Some(view) = world.chunks().iter().find(|c| c.id == chunk) {
                event = event.with_position(view.position.to_array());
            }
            tick_events.push(event);
        }
        Behavior::Wander | Behavior::Idle | Behavior::Pursue { .. } => {}
    }
}
