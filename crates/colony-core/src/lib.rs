//! Colony Organism AI
//!
//! Per-tick behavior selection for colonial microbes, plus a small bevy_ecs
//! sandbox that hosts it.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod events;
pub mod sandbox;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{ColonyConfig, ConfigError};
pub use sandbox::{EventTally, Sandbox};
pub use systems::ai::{OrganismAi, OrganismCommand};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Global simulation state resource
#[derive(Resource, Debug, Clone)]
pub struct SimulationState {
    pub current_tick: u64,
    pub max_ticks: u64,
    /// Seconds per tick
    pub dt: f32,
}

impl SimulationState {
    pub fn new(max_ticks: u64, dt: f32) -> Self {
        Self {
            current_tick: 0,
            max_ticks,
            dt,
        }
    }
}
