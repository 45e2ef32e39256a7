//! Behavior Selection
//!
//! The per-tick decision: refresh the wander goal, stick with a running
//! pursuit while frustration allows, otherwise pick prey, a chunk, or keep
//! wandering.

use glam::Vec3;
use rand::Rng;

use colony_events::PursuitKind;

use crate::components::organism::{Capability, Compound};
use crate::components::world::EntityId;

use super::command::OrganismCommand;
use super::sense::{chunks_worth_eating, prey_candidates, OrganismView, SensedWorld};
use super::state::{AbandonedPursuit, OrganismAi};
use super::steering::{heading_point, planar_distance_squared};
use super::tuning;

/// What the organism ended up doing this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Heading for the migration goal
    Wander,
    /// Prey was in range but the colony had neither toxin nor a pilus
    Idle,
    /// Turned toward a chunk
    Graze { chunk: EntityId },
    /// A pursuit slot was armed this tick; the chase starts next tick
    Engage { kind: PursuitKind, target: EntityId },
    /// Continued an armed pursuit
    Pursue { kind: PursuitKind, target: EntityId },
}

/// Result of one selector tick
#[derive(Debug, Clone, PartialEq)]
pub struct AiResponse {
    pub command: OrganismCommand,
    pub behavior: Behavior,
    /// Set when a new migration goal was drawn this tick
    pub new_migration_goal: Option<Vec3>,
    /// Pursuit slots cleared by frustration this tick
    pub abandoned: Vec<AbandonedPursuit>,
}

impl Default for AiResponse {
    fn default() -> Self {
        Self {
            command: OrganismCommand::new(),
            behavior: Behavior::Wander,
            new_migration_goal: None,
            abandoned: Vec::new(),
        }
    }
}

impl OrganismAi {
    /// Run one tick of behavior selection.
    ///
    /// `_delta` is the tick length in seconds; the policy is tick-based and
    /// does not scale with it.
    pub fn organism_behavior<R, W>(
        &mut self,
        _delta: f32,
        rng: &mut R,
        organism: &OrganismView<'_>,
        world: &W,
    ) -> AiResponse
    where
        R: Rng,
        W: SensedWorld + ?Sized,
    {
        let mut response = AiResponse::default();

        // Provisional wander goal, later steps may override the command
        let goal_reached = self
            .migration_goal
            .map_or(true, |goal| {
                organism.distance_squared_to(goal) < tuning::MIGRATION_ARRIVAL_DISTANCE_SQ
            });
        if goal_reached {
            let goal = self.wander_to_new_position(&mut response.command, rng, organism);
            response.new_migration_goal = Some(goal);
        }

        response.abandoned = self.expire_frustrated_pursuits();
        for abandoned in &response.abandoned {
            tracing::debug!(pursuit = ?abandoned.kind, target_id = ?abandoned.target, "pursuit abandoned");
        }

        if let Some(behavior) = self.run_existing_strategy(&mut response.command, rng, organism, world) {
            response.behavior = behavior;
            return response;
        }

        self.can_bite = organism.colony.any_member_has(Capability::Pilus);

        let prey = prey_candidates(organism, world);
        if let Some(first) = prey.first() {
            response.behavior = if organism.compounds.amount(Compound::Oxytoxy) > tuning::TOXIN_RESERVE_MIN {
                self.toxin_pursuit.arm(first.id);
                tracing::debug!(target_id = %first.id, "toxin pursuit started");
                Behavior::Engage {
                    kind: PursuitKind::Toxin,
                    target: first.id,
                }
            } else if self.can_bite {
                self.bite_pursuit.arm(first.id);
                self.bite_pursuit.frustration = tuning::BITE_FRUSTRATION_SEED;
                tracing::debug!(target_id = %first.id, "bite pursuit started");
                Behavior::Engage {
                    kind: PursuitKind::Bite,
                    target: first.id,
                }
            } else {
                Behavior::Idle
            };
            return response;
        }

        let chunks = chunks_worth_eating(organism, world);
        if let Some(chunk) = chunks.first() {
            self.turn(&mut response.command, organism, tuning::GRAZE_TURN);
            response.command.move_towards(organism.position, chunk.position);
            response.behavior = Behavior::Graze { chunk: chunk.id };
        } else if let Some(goal) = self.migration_goal {
            response.command.look_at = Some(goal);
            response.command.move_towards(organism.position, goal);
            response.behavior = Behavior::Wander;
        }

        response
    }

    /// Continue the running pursuit, bite first. Returns `None` when neither
    /// slot holds a target.
    fn run_existing_strategy<R, W>(
        &mut self,
        command: &mut OrganismCommand,
        rng: &mut R,
        organism: &OrganismView<'_>,
        world: &W,
    ) -> Option<Behavior>
    where
        R: Rng,
        W: SensedWorld + ?Sized,
    {
        match self.active_pursuit()? {
            PursuitKind::Bite => self.continue_bite_pursuit(command, rng, organism, world),
            PursuitKind::Toxin => self.continue_toxin_pursuit(command, organism, world),
        }
    }

    fn continue_bite_pursuit<R, W>(
        &mut self,
        command: &mut OrganismCommand,
        rng: &mut R,
        organism: &OrganismView<'_>,
        world: &W,
    ) -> Option<Behavior>
    where
        R: Rng,
        W: SensedWorld + ?Sized,
    {
        let target_id = self.bite_pursuit.target?;
        let target = world.locate(target_id);

        if let Some(target) = target {
            if planar_distance_squared(organism.look_at, target.position) < tuning::BITE_WORRY_DISTANCE_SQ {
                let turn = if rng.gen::<f32>() > 0.5 {
                    tuning::BITE_JITTER_TURN
                } else {
                    -tuning::BITE_JITTER_TURN
                };
                self.turn(command, organism, turn);
            } else {
                command.look_at = Some(target.position);
            }
        }

        self.bite_pursuit.frustration += tuning::BITE_FRUSTRATION_PER_TICK;

        let lost = match target {
            None => true,
            Some(target) => {
                let distance = organism.distance_squared_to(target.position);
                target.dead
                    || distance < tuning::BITE_MIN_DISTANCE_SQ
                    || distance > tuning::BITE_MAX_DISTANCE_SQ
            }
        };
        if lost {
            self.bite_pursuit.frustration += self.frustration_threshold;
        }

        Some(Behavior::Pursue {
            kind: PursuitKind::Bite,
            target: target_id,
        })
    }

    fn continue_toxin_pursuit<W>(
        &mut self,
        command: &mut OrganismCommand,
        organism: &OrganismView<'_>,
        world: &W,
    ) -> Option<Behavior>
    where
        W: SensedWorld + ?Sized,
    {
        let target_id = self.toxin_pursuit.target?;

        match world.locate(target_id).filter(|target| !target.dead) {
            None => {
                self.toxin_pursuit.frustration += self.frustration_threshold;
            }
            Some(target) => {
                command.look_at = Some(target.position);
                command.move_towards(organism.position, target.position);
                command.fire_toxin_at = Some(target.position);
                self.toxin_pursuit.frustration += tuning::TOXIN_FRUSTRATION_PER_TICK;
            }
        }

        Some(Behavior::Pursue {
            kind: PursuitKind::Toxin,
            target: target_id,
        })
    }

    fn wander_to_new_position<R: Rng>(
        &mut self,
        command: &mut OrganismCommand,
        rng: &mut R,
        organism: &OrganismView<'_>,
    ) -> Vec3 {
        let max = tuning::MIGRATION_MAX_OFFSET;
        let goal = organism.position
            + Vec3::new(rng.gen_range(-max..=max), 0.0, rng.gen_range(-max..=max));
        self.migration_goal = Some(goal);
        tracing::debug!(x = goal.x, z = goal.z, "new migration goal");

        command.look_at = Some(goal);
        command.move_towards(organism.position, goal);
        goal
    }

    /// Turn by `amount` radians, expressed as looking at a far point on the new heading
    fn turn(&mut self, command: &mut OrganismCommand, organism: &OrganismView<'_>, amount: f32) {
        self.facing_angle += amount;
        command.look_at = Some(heading_point(organism.position, self.facing_angle));
    }
}
