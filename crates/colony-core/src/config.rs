//! Configuration System
//!
//! Loads tuning parameters from colony.toml for easy adjustment without recompiling.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::systems::ai::tuning;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "colony.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColonyConfig {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
}

/// Behavior selector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Frustration at which a pursuit is abandoned
    pub frustration_threshold: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            frustration_threshold: tuning::DEFAULT_FRUSTRATION_THRESHOLD,
        }
    }
}

/// Initial population of the sandbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Number of AI-controlled colonies, each its own species
    pub colonies: usize,
    /// Cells per colony, master included
    pub members_per_colony: usize,
    /// How many of those cells carry a pilus
    pub biting_members: usize,
    /// Wild single-cell microbes
    pub wild_microbes: usize,
    /// Species the wild microbes are split across
    pub wild_species: usize,
    /// Floating chunks
    pub chunks: usize,
    /// Everything spawns within this distance of the origin
    pub spawn_radius: f32,
    /// Oxytoxy each colony starts with
    pub initial_oxytoxy: f32,
    /// Glucose held by each chunk
    pub chunk_glucose: f32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            colonies: 4,
            members_per_colony: 4,
            biting_members: 1,
            wild_microbes: 60,
            wild_species: 3,
            chunks: 40,
            spawn_radius: 250.0,
            initial_oxytoxy: 6.0,
            chunk_glucose: 5.0,
        }
    }
}

/// Stand-in command executor parameters
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Colony speed in units per second
    pub move_speed: f32,
    /// Wild microbe random-walk speed in units per second
    pub drift_speed: f32,
    /// Oxytoxy spent per shot
    pub toxin_cost: f32,
    /// Max distance from shooter to aim point
    pub toxin_range: f32,
    /// Max distance from aim point to the microbe that gets hit
    pub toxin_hit_radius: f32,
    /// Colonies with a pilus kill foreign microbes this close
    pub bite_radius: f32,
    /// Colonies eat chunks this close
    pub eat_radius: f32,
    /// Oxytoxy gained per second per toxisome member
    pub oxytoxy_regen: f32,
    /// Oxytoxy cap per colony
    pub oxytoxy_capacity: f32,
    /// Ticks a dead microbe lingers before it is removed
    pub corpse_ticks: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            move_speed: 30.0,
            drift_speed: 8.0,
            toxin_cost: 1.0,
            toxin_range: 45.0,
            toxin_hit_radius: 2.0,
            bite_radius: 10.0,
            eat_radius: 6.0,
            oxytoxy_regen: 0.5,
            oxytoxy_capacity: 12.0,
            corpse_ticks: 20,
        }
    }
}

impl ColonyConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.ai.frustration_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ai.frustration_threshold must be positive, got {}",
                threshold
            )));
        }
        if self.sandbox.biting_members > self.sandbox.members_per_colony {
            return Err(ConfigError::Invalid(format!(
                "sandbox.biting_members ({}) exceeds members_per_colony ({})",
                self.sandbox.biting_members, self.sandbox.members_per_colony
            )));
        }
        if self.sandbox.spawn_radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "sandbox.spawn_radius must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ColonyConfig::default();
        assert_eq!(config.ai.frustration_threshold, 100.0);
        assert!(config.sandbox.colonies > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = ColonyConfig::from_str(
            r#"
            [ai]
            frustration_threshold = 60.0

            [executor]
            move_speed = 12.0
            "#,
        )
        .unwrap();
        assert_eq!(config.ai.frustration_threshold, 60.0);
        assert_eq!(config.executor.move_speed, 12.0);
        assert_eq!(config.executor.corpse_ticks, 20);
        assert_eq!(config.sandbox, SandboxConfig::default());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = ColonyConfig::from_str("[ai]\nfrustration_threshold = 0.0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let result = ColonyConfig::from_str("[ai\nfrustration_threshold = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = ColonyConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(ColonyConfig::from_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sandbox]\ncolonies = 2\nchunks = 5").unwrap();

        let config = ColonyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sandbox.colonies, 2);
        assert_eq!(config.sandbox.chunks, 5);

        let missing = ColonyConfig::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
