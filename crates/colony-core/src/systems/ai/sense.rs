//! Sensing
//!
//! Read-only views of the organism and its surroundings, as seen by the
//! selector for one tick.

use glam::Vec3;

use crate::components::organism::{Colony, Compounds};
use crate::components::world::{EntityId, SpeciesId};

use super::tuning;

/// What the selector can see of a microbe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicrobeView {
    pub id: EntityId,
    pub position: Vec3,
    pub species: SpeciesId,
    pub dead: bool,
}

/// What the selector can see of a chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkView {
    pub id: EntityId,
    pub position: Vec3,
    /// Chunk still holds compounds
    pub edible: bool,
}

/// Provider of the sensed surroundings for a tick.
pub trait SensedWorld {
    /// Nearby microbes, in the order candidates should be preferred
    fn microbes(&self) -> &[MicrobeView];

    /// Nearby chunks, in the order candidates should be preferred
    fn chunks(&self) -> &[ChunkView];

    /// Resolve a tracked target. `None` means the entity no longer exists.
    fn locate(&self, id: EntityId) -> Option<MicrobeView>;
}

/// Plain list-backed surroundings
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub microbes: Vec<MicrobeView>,
    pub chunks: Vec<ChunkView>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_microbe(mut self, microbe: MicrobeView) -> Self {
        self.microbes.push(microbe);
        self
    }

    pub fn with_chunk(mut self, chunk: ChunkView) -> Self {
        self.chunks.push(chunk);
        self
    }
}

impl SensedWorld for Snapshot {
    fn microbes(&self) -> &[MicrobeView] {
        &self.microbes
    }

    fn chunks(&self) -> &[ChunkView] {
        &self.chunks
    }

    fn locate(&self, id: EntityId) -> Option<MicrobeView> {
        self.microbes.iter().find(|m| m.id == id).copied()
    }
}

/// The controlled organism, as seen by its own AI
#[derive(Debug, Clone, Copy)]
pub struct OrganismView<'a> {
    /// Master body position
    pub position: Vec3,
    /// Point the master body is currently facing
    pub look_at: Vec3,
    pub species: SpeciesId,
    pub colony: &'a Colony,
    pub compounds: &'a Compounds,
}

impl OrganismView<'_> {
    pub fn distance_squared_to(&self, point: Vec3) -> f32 {
        (point - self.position).length_squared()
    }
}

/// Live foreign microbes within prey range, in sensed order
pub fn prey_candidates<'w, W: SensedWorld + ?Sized>(
    organism: &OrganismView<'_>,
    world: &'w W,
) -> Vec<&'w MicrobeView> {
    world
        .microbes()
        .iter()
        .filter(|microbe| {
            microbe.species != organism.species
                && !microbe.dead
                && organism.distance_squared_to(microbe.position) < tuning::PREY_RANGE_SQ
        })
        .collect()
}

/// Edible chunks within chunk range, in sensed order
pub fn chunks_worth_eating<'w, W: SensedWorld + ?Sized>(
    organism: &OrganismView<'_>,
    world: &'w W,
) -> Vec<&'w ChunkView> {
    world
        .chunks()
        .iter()
        .filter(|chunk| {
            chunk.edible && organism.distance_squared_to(chunk.position) < tuning::CHUNK_RANGE_SQ
        })
        .collect()
}
