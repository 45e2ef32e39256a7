//! End-to-end colony scenarios
//!
//! Each test builds a small world by hand, runs it through the full tick
//! schedule, and checks the decisions and their effects.

use bevy_ecs::prelude::*;
use glam::Vec3;

use colony_core::components::{
    Capability, CapabilitySet, Chunk, Colony, Compound, Compounds, Facing, Member, Microbe, Position, SpeciesId,
};
use colony_core::events::EventLogger;
use colony_core::{ColonyConfig, OrganismAi, Sandbox};
use colony_events::{DecisionEvent, EventType, PursuitKind};

const DT: f32 = 0.1;

fn empty_sandbox() -> Sandbox {
    let config = ColonyConfig::default();
    let world = Sandbox::empty_world(7, &config, 200, DT, EventLogger::null());
    Sandbox::from_world(world)
}

fn spawn_colony(sandbox: &mut Sandbox, position: Vec3, members: Vec<Member>, oxytoxy: f32) -> Entity {
    let mut colony = Colony::new(members);
    let ai = OrganismAi::new(&mut colony, 100.0);
    sandbox
        .world_mut()
        .spawn((
            Position(position),
            Facing::new(position + Vec3::new(0.0, 0.0, -100.0)),
            Microbe::new(SpeciesId::new_random()),
            colony,
            Compounds::new().with(Compound::Oxytoxy, oxytoxy),
            ai,
        ))
        .id()
}

fn spawn_prey(sandbox: &mut Sandbox, position: Vec3) -> Entity {
    sandbox
        .world_mut()
        .spawn((Position(position), Microbe::new(SpeciesId::new_random())))
        .id()
}

fn biter() -> Member {
    Member::new(CapabilitySet::new().with(Capability::Pilus))
}

fn of_type(events: &[DecisionEvent], event_type: EventType) -> Vec<&DecisionEvent> {
    events.iter().filter(|e| e.event_type == event_type).collect()
}

#[test]
fn test_lone_colony_wanders() {
    let mut sandbox = empty_sandbox();
    let colony = spawn_colony(&mut sandbox, Vec3::ZERO, vec![Member::default()], 0.0);

    let events = sandbox.step().unwrap();
    let goals = of_type(&events, EventType::MigrationGoal);
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].organism, colony.to_bits());

    let goal = goals[0].position.unwrap();
    assert!(goal[0].abs() <= 200.0 && goal[2].abs() <= 200.0);
    assert_eq!(goal[1], 0.0);

    // Heading straight for the goal at move_speed
    let position = sandbox.world().get::<Position>(colony).unwrap().0;
    let expected = Vec3::from_array(goal).normalize_or_zero() * 30.0 * DT;
    assert!((position - expected).length() < 1e-3);

    // A far goal is kept on the following tick
    let events = sandbox.step().unwrap();
    if Vec3::from_array(goal).length_squared() > 400.0 {
        assert!(of_type(&events, EventType::MigrationGoal).is_empty());
    }
}

#[test]
fn test_toxin_pursuit_kills_prey() {
    let mut sandbox = empty_sandbox();
    let colony = spawn_colony(&mut sandbox, Vec3::ZERO, vec![Member::default()], 8.0);
    let prey = spawn_prey(&mut sandbox, Vec3::new(20.0, 0.0, 10.0));

    // Tick 0: the slot is armed, nothing is fired yet
    let events = sandbox.step().unwrap();
    let started = of_type(&events, EventType::PursuitStarted);
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].pursuit, Some(PursuitKind::Toxin));
    assert_eq!(started[0].target, Some(prey.to_bits()));
    assert!(of_type(&events, EventType::ToxinFired).is_empty());

    // Tick 1: the shot lands
    let events = sandbox.step().unwrap();
    assert_eq!(of_type(&events, EventType::ToxinFired).len(), 1);
    let kills = of_type(&events, EventType::PreyKilled);
    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].target, Some(prey.to_bits()));

    let world = sandbox.world();
    assert!(world.get::<Microbe>(prey).unwrap().dead);
    assert_eq!(world.get::<Compounds>(colony).unwrap().amount(Compound::Oxytoxy), 7.0);
    let ai = world.get::<OrganismAi>(colony).unwrap();
    assert_eq!(ai.pursuit(PursuitKind::Toxin).frustration, 10.0);

    // Tick 2: the dead target pushes frustration over the threshold,
    // tick 3 clears the slot
    sandbox.step().unwrap();
    let events = sandbox.step().unwrap();
    let abandoned = of_type(&events, EventType::PursuitAbandoned);
    assert_eq!(abandoned.len(), 1);
    assert_eq!(abandoned[0].pursuit, Some(PursuitKind::Toxin));
    assert_eq!(abandoned[0].target, Some(prey.to_bits()));
    assert!(!sandbox
        .world()
        .get::<OrganismAi>(colony)
        .unwrap()
        .has_existing_strategy());
}

#[test]
fn test_bite_pursuit_tracks_prey() {
    let mut sandbox = empty_sandbox();
    let colony = spawn_colony(&mut sandbox, Vec3::ZERO, vec![biter(), Member::default()], 0.0);
    let prey = spawn_prey(&mut sandbox, Vec3::new(20.0, 0.0, 10.0));

    let events = sandbox.step().unwrap();
    let started = of_type(&events, EventType::PursuitStarted);
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].pursuit, Some(PursuitKind::Bite));
    assert_eq!(started[0].frustration, Some(1.0));

    sandbox.step().unwrap();
    let world = sandbox.world();
    let ai = world.get::<OrganismAi>(colony).unwrap();
    assert!(ai.can_bite);
    assert_eq!(ai.pursuit(PursuitKind::Bite).target, Some(prey.into()));
    assert_eq!(ai.pursuit(PursuitKind::Bite).frustration, 6.0);
    assert!(!ai.pursuit(PursuitKind::Toxin).is_active());
}

#[test]
fn test_bite_kills_touching_prey() {
    let mut sandbox = empty_sandbox();
    let colony = spawn_colony(&mut sandbox, Vec3::ZERO, vec![biter()], 0.0);
    let prey = spawn_prey(&mut sandbox, Vec3::new(4.0, 0.0, 3.0));

    let events = sandbox.step().unwrap();
    let kills = of_type(&events, EventType::PreyKilled);
    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].organism, colony.to_bits());
    assert!(sandbox.world().get::<Microbe>(prey).unwrap().dead);
}

#[test]
fn test_despawned_target_is_abandoned() {
    let mut sandbox = empty_sandbox();
    let colony = spawn_colony(&mut sandbox, Vec3::ZERO, vec![Member::default()], 8.0);
    let prey = spawn_prey(&mut sandbox, Vec3::new(30.0, 0.0, 0.0));

    sandbox.step().unwrap();
    assert!(sandbox.world_mut().despawn(prey));

    // Missing target counts as dead: no shot, forced frustration
    let events = sandbox.step().unwrap();
    assert!(of_type(&events, EventType::ToxinFired).is_empty());
    let ai = sandbox.world().get::<OrganismAi>(colony).unwrap();
    assert_eq!(ai.pursuit(PursuitKind::Toxin).frustration, 100.0);

    let events = sandbox.step().unwrap();
    assert_eq!(of_type(&events, EventType::PursuitAbandoned).len(), 1);
}

#[test]
fn test_colony_grazes_chunk() {
    let mut sandbox = empty_sandbox();
    let colony = spawn_colony(&mut sandbox, Vec3::ZERO, vec![Member::default()], 0.0);
    let chunk = sandbox
        .world_mut()
        .spawn((
            Position::new(20.0, 0.0),
            Chunk::with_compounds(Compounds::new().with(Compound::Glucose, 5.0)),
        ))
        .id();

    let events = sandbox.step().unwrap();
    let grazing = of_type(&events, EventType::Grazing);
    assert_eq!(grazing.len(), 1);
    assert_eq!(grazing[0].target, Some(chunk.to_bits()));

    let mut eaten = Vec::new();
    for _ in 0..10 {
        let events = sandbox.step().unwrap();
        eaten.extend(of_type(&events, EventType::ChunkEaten).into_iter().cloned());
    }

    assert_eq!(eaten.len(), 1);
    assert_eq!(eaten[0].organism, colony.to_bits());
    assert!(sandbox.world().get_entity(chunk).is_none());
    let glucose = sandbox
        .world()
        .get::<Compounds>(colony)
        .unwrap()
        .amount(Compound::Glucose);
    assert_eq!(glucose, 5.0);
}

#[test]
fn test_same_species_is_not_prey() {
    let mut sandbox = empty_sandbox();
    let colony = spawn_colony(&mut sandbox, Vec3::ZERO, vec![biter()], 8.0);
    let species = sandbox.world().get::<Microbe>(colony).unwrap().species;
    sandbox
        .world_mut()
        .spawn((Position::new(15.0, 0.0), Microbe::new(species)));

    let events = sandbox.step().unwrap();
    assert!(of_type(&events, EventType::PursuitStarted).is_empty());
    assert_eq!(of_type(&events, EventType::MigrationGoal).len(), 1);
}

#[test]
fn test_corpses_are_cleaned_up() {
    let mut sandbox = empty_sandbox();
    spawn_colony(&mut sandbox, Vec3::ZERO, vec![biter()], 0.0);
    let prey = spawn_prey(&mut sandbox, Vec3::new(3.0, 0.0, 0.0));

    sandbox.step().unwrap();
    assert!(sandbox.world().get_entity(prey).is_some());

    for _ in 0..25 {
        sandbox.step().unwrap();
    }
    assert!(sandbox.world().get_entity(prey).is_none());
}

#[test]
fn test_full_sandbox_run() {
    let mut config = ColonyConfig::default();
    config.sandbox.spawn_radius = 120.0;
    let mut sandbox = Sandbox::new(42, &config, 300, DT, EventLogger::null());
    let before = sandbox.summary();

    let tally = sandbox.run(|_, _| {}).unwrap();
    let after = sandbox.summary();

    assert_eq!(sandbox.current_tick(), 300);
    assert!(tally.count(EventType::MigrationGoal) >= config.sandbox.colonies as u64);
    assert!(after.wild_microbes <= before.wild_microbes);
    assert!(after.chunks <= before.chunks);
    // Every death in the sandbox comes from a logged kill
    assert_eq!(
        tally.count(EventType::PreyKilled) as usize,
        (before.wild_microbes - after.wild_microbes) + (before.colonies - after.colonies)
    );
}
