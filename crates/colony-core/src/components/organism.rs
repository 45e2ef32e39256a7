//! Organism Components
//!
//! Components for colonial organisms: member cells, their capabilities,
//! and the shared compound pool.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Organelle-level capabilities a member cell can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Forward-facing pilus, lets the colony bite
    Pilus,
    /// Toxin vacuole, lets the colony produce oxytoxy
    Toxisome,
    /// Extra propulsion
    Flagellum,
    /// Senses compounds at range
    Chemoreceptor,
}

impl Capability {
    fn bit(self) -> u8 {
        match self {
            Capability::Pilus => 1 << 0,
            Capability::Toxisome => 1 << 1,
            Capability::Flagellum => 1 << 2,
            Capability::Chemoreceptor => 1 << 3,
        }
    }
}

/// Small set of capabilities, stored as a bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet(u8);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.insert(capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), CapabilitySet::with)
    }
}

/// Locomotion/membrane mode of a member cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocomotionMode {
    #[default]
    Normal,
    /// Membrane open, swallowing whatever it touches
    Engulf,
    /// Reaching out to bind another cell into the colony
    Binding,
}

/// One cell of a colony
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Member {
    pub capabilities: CapabilitySet,
    pub mode: LocomotionMode,
}

impl Member {
    pub fn new(capabilities: CapabilitySet) -> Self {
        Self {
            capabilities,
            mode: LocomotionMode::Normal,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }
}

/// Component: the member cells of a colony, master first
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Colony {
    pub members: Vec<Member>,
}

impl Colony {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    /// Check whether any member currently exposes a capability
    pub fn any_member_has(&self, capability: Capability) -> bool {
        self.members.iter().any(|member| member.has(capability))
    }
}

/// Compounds tracked in a resource pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compound {
    /// Attack compound spent on toxin shots
    Oxytoxy,
    Glucose,
    Atp,
}

/// Component: compound amounts held by a body
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compounds {
    amounts: HashMap<Compound, f32>,
}

impl Compounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, compound: Compound, amount: f32) -> Self {
        self.add(compound, amount);
        self
    }

    pub fn amount(&self, compound: Compound) -> f32 {
        self.amounts.get(&compound).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, compound: Compound, amount: f32) {
        *self.amounts.entry(compound).or_insert(0.0) += amount;
    }

    /// Remove up to `amount`, returning how much was actually taken
    pub fn take(&mut self, compound: Compound, amount: f32) -> f32 {
        let held = self.amounts.entry(compound).or_insert(0.0);
        let taken = amount.min(*held).max(0.0);
        *held -= taken;
        taken
    }

    /// Move everything from `other` into this pool
    pub fn absorb(&mut self, other: &Compounds) {
        for (&compound, &amount) in &other.amounts {
            self.add(compound, amount);
        }
    }
}
