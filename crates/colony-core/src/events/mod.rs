//! Event logging for the sandbox.

pub mod logger;

pub use logger::{EventLogger, LogError, TickEvents};
