//! Shared event types and serialization for the colony sandbox.
//!
//! This crate contains pure data structures with no simulation logic.

pub mod event;

pub use event::*;
