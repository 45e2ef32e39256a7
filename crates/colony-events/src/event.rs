//! Event Types
//!
//! Decision event records written by the colony sandbox, one JSON object per line.

use serde::{Deserialize, Serialize};

/// Primary event type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A new wander destination was picked
    MigrationGoal,
    /// A pursuit slot was armed with a target
    PursuitStarted,
    /// A pursuit slot hit its frustration ceiling and was cleared
    PursuitAbandoned,
    /// The organism turned toward a nearby chunk
    Grazing,
    /// A toxin shot was spent on a target
    ToxinFired,
    /// A microbe died to a bite or a toxin hit
    PreyKilled,
    /// A chunk was consumed
    ChunkEaten,
}

impl EventType {
    /// Returns all event type variants.
    pub fn all() -> &'static [EventType] {
        &[
            EventType::MigrationGoal,
            EventType::PursuitStarted,
            EventType::PursuitAbandoned,
            EventType::Grazing,
            EventType::ToxinFired,
            EventType::PreyKilled,
            EventType::ChunkEaten,
        ]
    }

    /// True for events emitted by the behavior selector itself, as opposed to
    /// the executor applying its commands.
    pub fn is_decision(&self) -> bool {
        matches!(
            self,
            EventType::MigrationGoal
                | EventType::PursuitStarted
                | EventType::PursuitAbandoned
                | EventType::Grazing
        )
    }
}

/// Which pursuit slot an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PursuitKind {
    /// Ranged chase, firing toxin at the target
    Toxin,
    /// Close chase, biting the target with pilus members
    Bite,
}

/// A single logged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// Unique identifier (e.g., "evt_00000042")
    pub event_id: String,
    /// Simulation tick the event happened on
    pub tick: u64,
    /// Organism (colony master) the event belongs to
    pub organism: u64,
    pub event_type: EventType,
    /// Pursuit slot involved, for pursuit events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pursuit: Option<PursuitKind>,
    /// Target entity, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u64>,
    /// World point of interest (goal, target position, chunk position)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 3]>,
    /// Frustration of the pursuit slot when the event was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frustration: Option<f32>,
}

impl DecisionEvent {
    /// Create a new event with required fields. The id is assigned by the logger.
    pub fn new(tick: u64, organism: u64, event_type: EventType) -> Self {
        Self {
            event_id: String::new(),
            tick,
            organism,
            event_type,
            pursuit: None,
            target: None,
            position: None,
            frustration: None,
        }
    }

    pub fn with_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = event_id.into();
        self
    }

    pub fn with_pursuit(mut self, pursuit: PursuitKind) -> Self {
        self.pursuit = Some(pursuit);
        self
    }

    pub fn with_target(mut self, target: u64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_frustration(mut self, frustration: f32) -> Self {
        self.frustration = Some(frustration);
        self
    }

    /// Serializes the event to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
