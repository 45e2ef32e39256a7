//! Sandbox Runner
//!
//! Owns the ECS world and tick schedule, and hands each tick's events to the
//! logger.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashMap;

use colony_events::{DecisionEvent, EventType};

use crate::config::ColonyConfig;
use crate::events::{EventLogger, LogError, TickEvents};
use crate::setup::{get_spawn_summary, spawn_sandbox, SpawnSummary};
use crate::systems::{tick_schedule, EntityIndex, PendingCommands, ToxinShots};
use crate::{SimRng, SimulationState};

/// A populated world plus the schedule that advances it
pub struct Sandbox {
    world: World,
    schedule: Schedule,
}

impl Sandbox {
    /// Build a world from `config`, spawn its population, and attach `logger`
    pub fn new(seed: u64, config: &ColonyConfig, max_ticks: u64, dt: f32, logger: EventLogger) -> Self {
        let mut world = Self::empty_world(seed, config, max_ticks, dt, logger);

        // Take the RNG out to avoid borrow conflicts
        if let Some(mut sim_rng) = world.remove_resource::<SimRng>() {
            spawn_sandbox(&mut world, &mut sim_rng.0, &config.sandbox, &config.ai);
            world.insert_resource(sim_rng);
        }

        Self {
            world,
            schedule: tick_schedule(),
        }
    }

    /// World with every resource the schedule needs and no entities
    pub fn empty_world(seed: u64, config: &ColonyConfig, max_ticks: u64, dt: f32, logger: EventLogger) -> World {
        let mut world = World::new();
        world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));
        world.insert_resource(SimulationState::new(max_ticks, dt));
        world.insert_resource(config.executor.clone());
        world.insert_resource(EntityIndex::new());
        world.insert_resource(PendingCommands::new());
        world.insert_resource(ToxinShots::default());
        world.insert_resource(TickEvents::new());
        world.insert_resource(logger);
        world
    }

    /// Wrap an already populated world
    pub fn from_world(world: World) -> Self {
        Self {
            world,
            schedule: tick_schedule(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn current_tick(&self) -> u64 {
        self.world.resource::<SimulationState>().current_tick
    }

    pub fn is_finished(&self) -> bool {
        let sim = self.world.resource::<SimulationState>();
        sim.current_tick >= sim.max_ticks
    }

    /// Run one tick and return the events it produced, ids assigned
    pub fn step(&mut self) -> Result<Vec<DecisionEvent>, LogError> {
        self.schedule.run(&mut self.world);

        let mut events = self.world.resource_mut::<TickEvents>().drain();
        let mut logger = self.world.resource_mut::<EventLogger>();
        for event in &mut events {
            if event.event_id.is_empty() {
                event.event_id = logger.next_id();
            }
        }
        logger.log_batch(events.iter().cloned())?;

        self.world.resource_mut::<SimulationState>().current_tick += 1;
        Ok(events)
    }

    /// Run until `max_ticks`, calling `on_tick` after every tick
    pub fn run<F>(&mut self, mut on_tick: F) -> Result<EventTally, LogError>
    where
        F: FnMut(u64, &[DecisionEvent]),
    {
        let mut tally = EventTally::default();
        while !self.is_finished() {
            let tick = self.current_tick();
            let events = self.step()?;
            tally.record(&events);
            on_tick(tick, &events);
        }
        self.flush()?;
        Ok(tally)
    }

    pub fn flush(&mut self) -> Result<(), LogError> {
        self.world.resource_mut::<EventLogger>().flush()
    }

    /// Current population, counted the same way as at spawn time
    pub fn summary(&mut self) -> SpawnSummary {
        get_spawn_summary(&mut self.world)
    }
}

/// Running count of events by type
#[derive(Debug, Clone, Default)]
pub struct EventTally {
    counts: HashMap<EventType, u64>,
}

impl EventTally {
    pub fn record(&mut self, events: &[DecisionEvent]) {
        for event in events {
            *self.counts.entry(event.event_type).or_insert(0) += 1;
        }
    }

    pub fn count(&self, event_type: EventType) -> u64 {
        self.counts.get(&event_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl std::fmt::Display for EventTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event_type in EventType::all() {
            writeln!(f, "  {:?}: {}", event_type, self.count(*event_type))?;
        }
        Ok(())
    }
}
