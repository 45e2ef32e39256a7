//! Perception System
//!
//! Rebuilds the per-tick index of microbes and chunks that colony AIs sense.

use bevy_ecs::prelude::*;
use std::collections::HashMap;

use crate::components::world::{Chunk, EntityId, Microbe, Position};
use crate::systems::ai::{ChunkView, MicrobeView, SensedWorld};

/// Resource: snapshot of every microbe and chunk, taken at the start of a tick
#[derive(Resource, Debug, Default)]
pub struct EntityIndex {
    microbes: Vec<MicrobeView>,
    chunks: Vec<ChunkView>,
    /// Maps id -> slot in `microbes`
    microbe_slots: HashMap<EntityId, usize>,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (called before rebuilding)
    pub fn clear(&mut self) {
        self.microbes.clear();
        self.chunks.clear();
        self.microbe_slots.clear();
    }

    pub fn add_microbe(&mut self, entity: Entity, position: &Position, microbe: &Microbe) {
        let id = EntityId::from(entity);
        self.microbe_slots.insert(id, self.microbes.len());
        self.microbes.push(MicrobeView {
            id,
            position: position.0,
            species: microbe.species,
            dead: microbe.dead,
        });
    }

    pub fn add_chunk(&mut self, entity: Entity, position: &Position, chunk: &Chunk) {
        self.chunks.push(ChunkView {
            id: EntityId::from(entity),
            position: position.0,
            edible: chunk.is_edible(),
        });
    }

}

impl SensedWorld for EntityIndex {
    fn microbes(&self) -> &[MicrobeView] {
        &self.microbes
    }

    fn chunks(&self) -> &[ChunkView] {
        &self.chunks
    }

    fn locate(&self, id: EntityId) -> Option<MicrobeView> {
        self.microbe_slots
            .get(&id)
            .and_then(|&slot| self.microbes.get(slot))
            .copied()
    }
}

/// System to rebuild the EntityIndex.
/// This runs first so every colony senses the same snapshot.
pub fn build_entity_index(
    mut index: ResMut<EntityIndex>,
    microbes: Query<(Entity, &Position, &Microbe)>,
    chunks: Query<(Entity, &Position, &Chunk)>,
) {
    index.clear();

    for (entity, position, microbe) in microbes.iter() {
        index.add_microbe(entity, position, microbe);
    }
    for (entity, position, chunk) in chunks.iter() {
        index.add_chunk(entity, position, chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::world::SpeciesId;

    #[test]
    fn test_index_tracks_despawned_entities() {
        let mut world = World::new();
        world.insert_resource(EntityIndex::new());

        let species = SpeciesId::new_random();
        let a = world.spawn((Position::new(1.0, 2.0), Microbe::new(species))).id();
        let b = world.spawn((Position::new(3.0, 4.0), Microbe::new(species))).id();
        let chunk = world.spawn((Position::new(0.0, 0.0), Chunk::default())).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(build_entity_index);
        schedule.run(&mut world);

        {
            let index = world.resource::<EntityIndex>();
            assert_eq!(index.microbes().len(), 2);
            assert_eq!(index.chunks().len(), 1);
            assert!(!index.chunks()[0].edible);
            assert_eq!(index.chunks()[0].id, EntityId::from(chunk));
        }

        world.despawn(b);
        schedule.run(&mut world);

        let index = world.resource::<EntityIndex>();
        assert!(index.locate(EntityId::from(b)).is_none());
        let located = index.locate(EntityId::from(a)).unwrap();
        assert_eq!(located.position, Position::new(1.0, 2.0).0);
        assert_eq!(index.microbes().len(), 1);
    }
}
