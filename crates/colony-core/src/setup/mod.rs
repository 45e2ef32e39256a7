//! Sandbox Setup
//!
//! World creation and initial population.

pub mod spawn;

pub use spawn::*;
