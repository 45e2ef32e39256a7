//! Sandbox Spawning
//!
//! Functions to spawn AI colonies, wild microbes, and floating chunks at
//! random positions around the origin.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::organism::{Capability, CapabilitySet, Colony, Compound, Compounds, Member};
use crate::components::world::{Chunk, Facing, Microbe, Position, SpeciesId};
use crate::config::{AiConfig, SandboxConfig};
use crate::systems::ai::OrganismAi;

/// Uniform random point on the ground plane within `radius` of the origin
fn random_position(rng: &mut SmallRng, radius: f32) -> Position {
    let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    // sqrt keeps the density uniform over the disc
    let distance = radius * rng.gen::<f32>().sqrt();
    Position::new(angle.cos() * distance, angle.sin() * distance)
}

/// Capabilities for the member at `index`.
///
/// The first `biting_members` cells carry a pilus. The last cell is the
/// toxin producer. Everyone else swims.
fn member_capabilities(index: usize, config: &SandboxConfig) -> CapabilitySet {
    let mut capabilities = CapabilitySet::new();
    if index < config.biting_members {
        capabilities.insert(Capability::Pilus);
    }
    if index + 1 == config.members_per_colony {
        capabilities.insert(Capability::Toxisome);
    }
    if capabilities.is_empty() {
        capabilities.insert(Capability::Flagellum);
    }
    if index == 0 {
        capabilities.insert(Capability::Chemoreceptor);
    }
    capabilities
}

/// Spawn a single AI colony of a fresh species
pub fn spawn_colony(
    world: &mut World,
    rng: &mut SmallRng,
    sandbox: &SandboxConfig,
    ai: &AiConfig,
) -> Entity {
    let members = (0..sandbox.members_per_colony)
        .map(|index| Member::new(member_capabilities(index, sandbox)))
        .collect();
    let mut colony = Colony::new(members);
    let organism_ai = OrganismAi::new(&mut colony, ai.frustration_threshold);

    let species = SpeciesId::from_rng(rng);
    let position = random_position(rng, sandbox.spawn_radius);
    let heading: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let look_at = position.0 + Vec3::new(heading.cos(), 0.0, heading.sin());

    world
        .spawn((
            position,
            Facing::new(look_at),
            Microbe::new(species),
            colony,
            Compounds::new().with(Compound::Oxytoxy, sandbox.initial_oxytoxy),
            organism_ai,
        ))
        .id()
}

/// Spawn wild single-cell microbes split round-robin across `wild_species`
pub fn spawn_wild_microbes(world: &mut World, rng: &mut SmallRng, sandbox: &SandboxConfig) -> usize {
    let species: Vec<SpeciesId> = (0..sandbox.wild_species.max(1))
        .map(|_| SpeciesId::from_rng(rng))
        .collect();

    for index in 0..sandbox.wild_microbes {
        let position = random_position(rng, sandbox.spawn_radius);
        world.spawn((position, Microbe::new(species[index % species.len()])));
    }

    sandbox.wild_microbes
}

/// Spawn floating chunks, each holding the configured glucose
pub fn spawn_chunks(world: &mut World, rng: &mut SmallRng, sandbox: &SandboxConfig) -> usize {
    for _ in 0..sandbox.chunks {
        let position = random_position(rng, sandbox.spawn_radius);
        let compounds = Compounds::new().with(Compound::Glucose, sandbox.chunk_glucose);
        world.spawn((position, Chunk::with_compounds(compounds)));
    }

    sandbox.chunks
}

/// Spawn the whole sandbox population
pub fn spawn_sandbox(
    world: &mut World,
    rng: &mut SmallRng,
    sandbox: &SandboxConfig,
    ai: &AiConfig,
) -> SpawnSummary {
    for _ in 0..sandbox.colonies {
        spawn_colony(world, rng, sandbox, ai);
    }
    spawn_wild_microbes(world, rng, sandbox);
    spawn_chunks(world, rng, sandbox);

    get_spawn_summary(world)
}

/// Get summary stats for the spawned population
pub fn get_spawn_summary(world: &mut World) -> SpawnSummary {
    let mut summary = SpawnSummary::default();

    let mut microbes = world.query::<(&Microbe, Option<&Colony>)>();
    for (microbe, colony) in microbes.iter(world) {
        if microbe.dead {
            continue;
        }
        match colony {
            Some(colony) => {
                summary.colonies += 1;
                summary.colony_members += colony.members.len();
                if colony.any_member_has(Capability::Pilus) {
                    summary.biting_colonies += 1;
                }
            }
            None => summary.wild_microbes += 1,
        }
    }

    let mut chunks = world.query::<&Chunk>();
    summary.chunks = chunks.iter(world).filter(|chunk| chunk.is_edible()).count();

    summary
}

/// Summary of a spawned or running sandbox
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnSummary {
    pub colonies: usize,
    pub colony_members: usize,
    pub biting_colonies: usize,
    pub wild_microbes: usize,
    pub chunks: usize,
}

impl std::fmt::Display for SpawnSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Colonies: {} ({} members, {} can bite)",
            self.colonies, self.colony_members, self.biting_colonies
        )?;
        writeln!(f, "Wild microbes: {}", self.wild_microbes)?;
        writeln!(f, "Chunks: {}", self.chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::organism::LocomotionMode;
    use rand::SeedableRng;

    #[test]
    fn test_member_capabilities() {
        let config = SandboxConfig {
            members_per_colony: 4,
            biting_members: 1,
            ..Default::default()
        };

        assert!(member_capabilities(0, &config).contains(Capability::Pilus));
        assert!(member_capabilities(0, &config).contains(Capability::Chemoreceptor));
        assert!(member_capabilities(1, &config).contains(Capability::Flagellum));
        assert!(!member_capabilities(2, &config).contains(Capability::Pilus));
        assert!(member_capabilities(3, &config).contains(Capability::Toxisome));
    }

    #[test]
    fn test_spawn_sandbox_counts() {
        let mut world = World::new();
        let mut rng = SmallRng::seed_from_u64(42);
        let sandbox = SandboxConfig {
            colonies: 3,
            wild_microbes: 10,
            chunks: 4,
            ..Default::default()
        };

        let summary = spawn_sandbox(&mut world, &mut rng, &sandbox, &AiConfig::default());

        assert_eq!(summary.colonies, 3);
        assert_eq!(summary.colony_members, 3 * sandbox.members_per_colony);
        assert_eq!(summary.biting_colonies, 3);
        assert_eq!(summary.wild_microbes, 10);
        assert_eq!(summary.chunks, 4);
    }

    #[test]
    fn test_positions_within_radius() {
        let mut world = World::new();
        let mut rng = SmallRng::seed_from_u64(1);
        let sandbox = SandboxConfig {
            spawn_radius: 50.0,
            ..Default::default()
        };
        spawn_sandbox(&mut world, &mut rng, &sandbox, &AiConfig::default());

        let mut positions = world.query::<&Position>();
        for position in positions.iter(&world) {
            assert_eq!(position.0.y, 0.0);
            assert!(position.0.length() <= 50.0 + 1e-3);
        }
    }

    #[test]
    fn test_spawned_colonies_are_ready() {
        let mut world = World::new();
        let mut rng = SmallRng::seed_from_u64(9);
        let sandbox = SandboxConfig::default();
        let ai_config = AiConfig {
            frustration_threshold: 40.0,
        };
        let entity = spawn_colony(&mut world, &mut rng, &sandbox, &ai_config);

        let ai = world.get::<OrganismAi>(entity).unwrap();
        assert_eq!(ai.frustration_threshold, 40.0);
        assert!(!ai.has_existing_strategy());

        let colony = world.get::<Colony>(entity).unwrap();
        assert!(colony.any_member_has(Capability::Pilus));
        assert!(colony
            .members
            .iter()
            .all(|member| member.mode == LocomotionMode::Normal));

        let oxytoxy = world.get::<Compounds>(entity).unwrap().amount(Compound::Oxytoxy);
        assert_eq!(oxytoxy, sandbox.initial_oxytoxy);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let layout = |seed: u64| {
            let mut world = World::new();
            let mut rng = SmallRng::seed_from_u64(seed);
            spawn_sandbox(&mut world, &mut rng, &SandboxConfig::default(), &AiConfig::default());
            let mut positions = world.query::<&Position>();
            positions.iter(&world).map(|p| p.0).collect::<Vec<_>>()
        };

        assert_eq!(layout(3), layout(3));
        assert_ne!(layout(3), layout(4));
    }
}
