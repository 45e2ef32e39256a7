//! World Components
//!
//! Components for positions, microbes, and floating chunks.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

use super::organism::Compounds;

/// Stable identifier for an entity, safe to persist across ticks.
///
/// Holding an `EntityId` never keeps the entity alive; it has to be resolved
/// through a lookup every time it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl From<Entity> for EntityId {
    fn from(entity: Entity) -> Self {
        EntityId(entity.to_bits())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Species identity shared by every microbe of a lineage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesId(pub Uuid);

impl SpeciesId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Random v4 id drawn from a seeded generator, for reproducible runs
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self(Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

/// Component: world-space position on the ground plane (y is up)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position(pub Vec3);

impl Position {
    pub fn new(x: f32, z: f32) -> Self {
        Self(Vec3::new(x, 0.0, z))
    }
}

/// Component: the point a body is currently oriented toward
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facing {
    pub look_at: Vec3,
}

impl Facing {
    pub fn new(look_at: Vec3) -> Self {
        Self { look_at }
    }
}

/// Component: a single microbe body (wild cells and colony masters alike)
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Microbe {
    pub species: SpeciesId,
    pub dead: bool,
}

impl Microbe {
    pub fn new(species: SpeciesId) -> Self {
        Self {
            species,
            dead: false,
        }
    }
}

/// Component: tick on which a microbe died, used to despawn corpses later
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpse {
    pub died_at: u64,
}

/// Component: a floating chunk of detritus
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chunk {
    /// Compounds still held by the chunk. Spent chunks have none.
    pub compounds: Option<Compounds>,
}

impl Chunk {
    pub fn with_compounds(compounds: Compounds) -> Self {
        Self {
            compounds: Some(compounds),
        }
    }

    /// A chunk is worth eating while it still holds compounds
    pub fn is_edible(&self) -> bool {
        self.compounds.is_some()
    }
}
