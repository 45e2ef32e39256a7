//! ECS Components
//!
//! Entity components for colonies, microbes, and chunks.

pub mod organism;
pub mod world;

pub use organism::*;
pub use world::*;
